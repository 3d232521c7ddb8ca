use serde::{Deserialize, Serialize};

/// Everything persisted for one hosted game, one JSON section per concern so
/// each can be inspected or repaired on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub config: serde_json::Value,
    pub rules: serde_json::Value,
    pub phase: serde_json::Value,
    pub voting_enabled: bool,
    pub votes: serde_json::Value,
    pub vote_history: serde_json::Value,
    pub players: serde_json::Value,
    pub player_slots: serde_json::Value,
    pub action_submissions: serde_json::Value,
    pub roles: serde_json::Value,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
