use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/appointments
#[derive(Deserialize)]
pub struct AppointmentsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct AppointmentResponse {
    id: String,
    client_id: String,
    service_name: String,
    date: String,
    time: String,
    status: String,
    created_at: String,
}

pub async fn get_appointments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let appointments = {
        let db = state.db.lock().unwrap();
        queries::get_all_appointments(&db, query.status.as_deref(), limit)?
    };

    let response = appointments
        .into_iter()
        .map(|a| AppointmentResponse {
            id: a.id,
            client_id: a.client_id,
            service_name: a.service_name,
            date: a.date.format("%Y-%m-%d").to_string(),
            time: a.time,
            status: a.status.as_str().to_string(),
            created_at: a.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// POST /api/admin/appointments/:id/cancel
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let cancelled = {
        let db = state.db.lock().unwrap();
        queries::cancel_appointment(&db, &id)?
    };

    if !cancelled {
        return Err(AppError::NotFound(format!("appointment {id}")));
    }

    tracing::info!(appointment_id = %id, "appointment cancelled by admin");
    Ok(Json(serde_json::json!({ "ok": true })))
}

// GET /api/admin/log
#[derive(Deserialize)]
pub struct LogQuery {
    pub client_id: Option<String>,
    pub limit: Option<i64>,
}

pub async fn get_log(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<LogQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(200);
    let events = {
        let db = state.db.lock().unwrap();
        queries::get_log_events(&db, query.client_id.as_deref(), limit)?
    };

    Ok(Json(serde_json::to_value(events).unwrap_or_default()))
}
