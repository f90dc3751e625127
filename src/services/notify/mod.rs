pub mod webhook;

use async_trait::async_trait;

/// Owner-facing notification channel for booking events.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &str, payload: &serde_json::Value) -> anyhow::Result<()>;
}

/// Used when no webhook is configured; notifications become log lines.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, event: &str, payload: &serde_json::Value) -> anyhow::Result<()> {
        tracing::debug!(event, %payload, "notifier not configured, dropping notification");
        Ok(())
    }
}
