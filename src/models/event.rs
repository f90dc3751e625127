use serde::{Deserialize, Serialize};

/// One interaction-log row; also what SSE subscribers receive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub id: i64,
    pub client_id: String,
    pub kind: String,
    pub content: String,
    pub created_at: String,
}
