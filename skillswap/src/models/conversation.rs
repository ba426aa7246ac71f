//! Direct conversation models.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{ConversationId, UserId};

/// A two-party conversation document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Canonical id, see [`ConversationId::between`].
    #[serde(default)]
    pub id: ConversationId,
    /// Both participants.
    #[serde(default)]
    pub participants: Vec<UserId>,
    /// Skill the conversation was started from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
}

impl Conversation {
    /// Check whether `user` takes part in this conversation.
    pub fn includes(&self, user: &UserId) -> bool {
        self.participants.iter().any(|p| p == user)
    }

    /// The participant that is not `user`.
    pub fn other(&self, user: &UserId) -> Option<&UserId> {
        self.participants.iter().find(|p| *p != user)
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Document ID.
    #[serde(default)]
    pub id: String,
    /// Author.
    #[serde(rename = "sender")]
    pub sender_id: UserId,
    /// Message body.
    pub text: String,
    /// Server-assigned time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

impl Message {
    /// Server time as a `DateTime`.
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Check whether `user` wrote this message.
    pub fn is_from(&self, user: &UserId) -> bool {
        &self.sender_id == user
    }
}

/// Per-participant watermark of the last observed message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastRead {
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_other() {
        let conv = Conversation {
            id: "a_b".into(),
            participants: vec!["a".into(), "b".into()],
            skill: None,
        };
        assert!(conv.includes(&"a".into()));
        assert_eq!(conv.other(&"a".into()), Some(&UserId::new("b")));
        assert!(!conv.includes(&"c".into()));
    }

    #[test]
    fn test_message_sent_at() {
        let msg = Message {
            timestamp: 1_700_000_000_000,
            ..Default::default()
        };
        let at = msg.sent_at().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
    }
}
