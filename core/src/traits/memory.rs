use crate::traits::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    Human,
    Ai,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Ai => write!(f, "ai"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Human,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Ai,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_message(&self) -> ChatMessage {
        match self.role {
            TurnRole::Human => ChatMessage::user(self.content.clone()),
            TurnRole::Ai => ChatMessage::assistant(self.content.clone()),
        }
    }
}

/// Ordered turn log of one `(user_id, session_id)` conversation.
pub trait ChatHistory: Send + Sync {
    fn name(&self) -> &str;

    /// Create whatever backing storage the session needs. Idempotent.
    fn prepare(&self) -> anyhow::Result<()>;

    fn append(&self, turn: ChatTurn) -> anyhow::Result<()>;

    /// The most recent `k` turns, oldest first.
    fn last(&self, k: usize) -> anyhow::Result<Vec<ChatTurn>>;

    fn clear(&self) -> anyhow::Result<()>;
}
