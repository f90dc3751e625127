use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::BookingStage;
use crate::services::assistant::{self, replies};
use crate::services::timefmt;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub client_id: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub stage: String,
}

// POST /api/chat/message
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let client_id = payload.client_id.trim().to_string();
    let message = payload.message.trim().to_string();

    if client_id.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest(
            "client_id and message are required".to_string(),
        ));
    }

    // The dialogue never shows the user a technical failure; a broken turn
    // degrades to a conversational apology.
    let reply = match assistant::process_message(&state, &client_id, &message).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, %client_id, "dialogue processing failed");
            replies::ERROR_FALLBACK.to_string()
        }
    };

    let stage = {
        let db = state.db.lock().unwrap();
        queries::get_session(&db, &client_id)?
            .map(|s| s.stage)
            .unwrap_or(BookingStage::Idle)
    };

    Ok(Json(ChatResponse {
        reply,
        stage: stage.as_str().to_string(),
    }))
}

#[derive(Serialize)]
pub struct HistoryMessage {
    pub id: String,
    pub text: String,
    pub sender: String,
    pub timestamp: String,
    pub displayed_at: String,
}

// GET /api/chat/history/:client_id
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<HistoryMessage>>, AppError> {
    let session = {
        let db = state.db.lock().unwrap();
        queries::get_session(&db, &client_id)?
    };

    let now = Utc::now();
    let messages = session
        .map(|s| s.messages)
        .unwrap_or_default()
        .iter()
        .map(|m| HistoryMessage {
            id: m.id.clone(),
            text: m.text.clone(),
            sender: m.sender.as_str().to_string(),
            timestamp: m.timestamp.to_rfc3339(),
            displayed_at: timefmt::relative_label(m.timestamp, now),
        })
        .collect();

    Ok(Json(messages))
}

// GET /api/chat/events/:client_id
pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events_tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) if event.client_id == client_id => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().event(event.kind.clone()).data(data)))
        }
        _ => None,
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

// POST /api/chat/close/:client_id
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Json<serde_json::Value> {
    state.tips.cancel(&client_id);
    tracing::info!(%client_id, "session closed");
    Json(serde_json::json!({ "ok": true }))
}
