use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use atendente::config::AppConfig;
use atendente::db;
use atendente::handlers;
use atendente::services::notify::webhook::WebhookNotifier;
use atendente::services::notify::{NoopNotifier, Notifier};
use atendente::services::tips::TipScheduler;
use atendente::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let notifier: Box<dyn Notifier> = if config.owner_webhook_url.is_empty() {
        tracing::info!("no owner webhook configured, notifications disabled");
        Box::new(NoopNotifier)
    } else {
        tracing::info!(url = %config.owner_webhook_url, "using owner webhook notifier");
        Box::new(WebhookNotifier::new(
            config.owner_webhook_url.clone(),
            config.owner_webhook_secret.clone(),
        ))
    };

    let (events_tx, _) = broadcast::channel(256);

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        notifier,
        tips: TipScheduler::new(),
        events_tx,
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
