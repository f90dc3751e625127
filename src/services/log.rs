use std::sync::Arc;

use crate::db::queries;
use crate::models::SessionEvent;
use crate::state::AppState;

/// Append an interaction-log entry and push it to SSE subscribers.
/// Best-effort on both sides: a failed insert is logged, a broadcast with
/// no receivers is ignored.
pub fn record_event(state: &Arc<AppState>, client_id: &str, kind: &str, content: &str) {
    let event_id = {
        let db = state.db.lock().unwrap();
        queries::insert_log_event(&db, client_id, kind, content)
    };

    match event_id {
        Ok(id) => {
            let event = SessionEvent {
                id,
                client_id: client_id.to_string(),
                kind: kind.to_string(),
                content: content.to_string(),
                created_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            };
            let _ = state.events_tx.send(event);
        }
        Err(e) => {
            tracing::error!(error = %e, client_id, kind, "failed to record interaction event");
        }
    }
}
