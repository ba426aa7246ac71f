//! Chat handlers.

use anyhow::{Context, Result};
use colored::Colorize;
use rust_i18n::t;
use serde::Serialize;
use skillswap::{Message, SkillSwapClient, UserId};

use crate::output::{format_relative_time, PlainPrint, TableRow};

/// Message info.
#[derive(Debug, Clone, Serialize)]
pub struct MessageInfo {
    pub id: String,
    pub from_uid: String,
    pub is_mine: bool,
    pub text: String,
    pub time: i64,
}

impl MessageInfo {
    pub fn new(message: &Message, me: &UserId) -> Self {
        Self {
            id: message.id.clone(),
            from_uid: message.sender_id.to_string(),
            is_mine: message.is_from(me),
            text: message.text.clone(),
            time: message.timestamp,
        }
    }
}

impl TableRow for MessageInfo {
    fn headers() -> Vec<&'static str> {
        vec!["From", "Text", "Time"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.from_uid.clone(),
            self.text.clone(),
            format_relative_time(self.time),
        ]
    }
}

impl PlainPrint for MessageInfo {
    fn plain_print(&self) {
        let from = if self.is_mine {
            t!("you_label").to_string().green().to_string()
        } else {
            self.from_uid.cyan().to_string()
        };
        println!("{} {}", from, format_relative_time(self.time).dimmed());
        for line in self.text.lines() {
            println!("   {}", line);
        }
    }
}

/// Conversation history.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResult {
    pub conversation: String,
    pub peer: String,
    pub messages: Vec<MessageInfo>,
}

/// Send message result.
#[derive(Debug, Clone, Serialize)]
pub struct SendResult {
    pub conversation: String,
    pub message_id: Option<String>,
}

/// Unread message count.
#[derive(Debug, Clone, Serialize)]
pub struct UnreadResult {
    pub peer: String,
    pub unread: usize,
}

fn me(client: &SkillSwapClient) -> Result<UserId> {
    client
        .current_uid()
        .context("Authentication required. Run 'skillswap auth login' first.")
}

/// Messages exchanged with `peer`.
pub async fn history(client: &SkillSwapClient, peer: &str) -> Result<HistoryResult> {
    let me = me(client)?;
    let chats = client.chats();
    let id = chats.conversation_id(peer)?;
    let messages = chats.history(&id).await?;
    Ok(HistoryResult {
        conversation: id.to_string(),
        peer: peer.to_string(),
        messages: messages.iter().map(|m| MessageInfo::new(m, &me)).collect(),
    })
}

/// Send one message to `peer`. Blank text sends nothing.
pub async fn send(client: &SkillSwapClient, peer: &str, text: &str) -> Result<SendResult> {
    let chats = client.chats();
    let id = chats.conversation_id(peer)?;
    let message_id = chats.send(peer, text).await?;
    Ok(SendResult {
        conversation: id.to_string(),
        message_id,
    })
}

/// Unread messages from `peer`.
pub async fn unread(client: &SkillSwapClient, peer: &str) -> Result<UnreadResult> {
    let unread = client.chats().unread_count(peer).await?;
    Ok(UnreadResult {
        peer: peer.to_string(),
        unread,
    })
}
