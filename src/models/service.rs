use serde::{Deserialize, Serialize};

/// Catalog entry. `sort_order` is also the tie-break when a message matches
/// more than one service name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub duration_minutes: i32,
    pub sort_order: i32,
}
