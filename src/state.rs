use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::models::SessionEvent;
use crate::services::notify::Notifier;
use crate::services::tips::TipScheduler;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub notifier: Box<dyn Notifier>,
    pub tips: TipScheduler,
    pub events_tx: broadcast::Sender<SessionEvent>,
}
