pub mod admin;
pub mod chat;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Shared by `main` and the integration tests.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/chat/message", post(chat::post_message))
        .route("/api/chat/history/:client_id", get(chat::get_history))
        .route("/api/chat/events/:client_id", get(chat::events_stream))
        .route("/api/chat/close/:client_id", post(chat::close_session))
        .route("/api/admin/appointments", get(admin::get_appointments))
        .route(
            "/api/admin/appointments/:id/cancel",
            post(admin::cancel_appointment),
        )
        .route("/api/admin/log", get(admin::get_log))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
