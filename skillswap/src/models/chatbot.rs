//! Assistant widget turns.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Bot,
}

/// One line of the assistant transcript. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatBotTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatBotTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Bot,
            content: content.into(),
        }
    }
}
