use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::models::{ChatMessage, Sender};
use crate::services::log;
use crate::state::AppState;

/// Rotating nudges sent to a quiet session.
pub const TIPS: &[&str] = &[
    "💡 Dica: agende com antecedência, os horários de sábado costumam esgotar rápido!",
    "✨ Sabia que temos pacotes com desconto para coloração + corte? Pergunte aqui!",
    "💜 Toda semana tem promoção nova. Quer saber a desta semana?",
    "⏰ Precisa de um horário? É só me dizer \"quero agendar\" que eu cuido do resto.",
];

/// Owns the idle-tip task of each active session. Exactly one task per
/// session: scheduling again replaces (aborts) the previous task, closing
/// the session removes it.
pub struct TipScheduler {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
    next: AtomicUsize,
}

impl TipScheduler {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            next: AtomicUsize::new(0),
        }
    }

    pub fn next_tip(&self) -> &'static str {
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        TIPS[idx % TIPS.len()]
    }

    pub fn install(&self, client_id: &str, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(previous) = tasks.insert(client_id.to_string(), handle) {
            previous.abort();
        }
    }

    pub fn cancel(&self, client_id: &str) {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(handle) = tasks.remove(client_id) {
            handle.abort();
        }
    }

    pub fn is_scheduled(&self, client_id: &str) -> bool {
        self.tasks.lock().unwrap().contains_key(client_id)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

impl Default for TipScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// (Re)start the idle timer for a session. Called after every user
/// message, so activity pushes the next tip further out instead of
/// stacking timers.
pub fn reschedule(state: &Arc<AppState>, client_id: &str) {
    let interval = Duration::from_secs(state.config.tip_interval_secs.max(1));
    let task_state = Arc::clone(state);
    let task_client = client_id.to_string();

    let handle = tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            deliver_tip(&task_state, &task_client);
        }
    });

    state.tips.install(client_id, handle);
}

/// Append the next rotating tip to the transcript and broadcast it.
pub fn deliver_tip(state: &Arc<AppState>, client_id: &str) {
    let tip = state.tips.next_tip();

    let saved = {
        let db = state.db.lock().unwrap();
        crate::db::queries::get_session(&db, client_id).and_then(|session| match session {
            Some(mut session) => {
                session.messages.push(ChatMessage::new(Sender::Assistant, tip));
                session.last_activity = chrono::Utc::now().naive_utc();
                crate::db::queries::save_session(&db, &session)
            }
            // Session vanished; nothing to annotate.
            None => Ok(()),
        })
    };

    if let Err(e) = saved {
        tracing::warn!(error = %e, client_id, "failed to append tip to session");
        return;
    }

    log::record_event(state, client_id, "tip", tip);
    tracing::debug!(client_id, "tip delivered");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_rotation_cycles() {
        let scheduler = TipScheduler::new();
        let first = scheduler.next_tip();
        for _ in 0..TIPS.len() - 1 {
            scheduler.next_tip();
        }
        assert_eq!(scheduler.next_tip(), first);
    }

    #[tokio::test]
    async fn test_install_replaces_previous_task() {
        let scheduler = TipScheduler::new();

        let first = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        scheduler.install("c1", first);

        let second = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        scheduler.install("c1", second);

        assert_eq!(scheduler.active_count(), 1);
        assert!(scheduler.is_scheduled("c1"));
    }

    #[tokio::test]
    async fn test_cancel_removes_task() {
        let scheduler = TipScheduler::new();
        let handle = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        scheduler.install("c1", handle);

        scheduler.cancel("c1");
        assert!(!scheduler.is_scheduled("c1"));
        assert_eq!(scheduler.active_count(), 0);

        // Cancelling an unknown session is a no-op.
        scheduler.cancel("c2");
    }
}
