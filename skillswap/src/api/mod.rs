//! API modules.

mod chat;
mod listing;
mod rating;

pub use chat::{ChatApi, ChatSession};
pub use listing::{Browser, ListingApi};
pub use rating::{RatingApi, TeacherRatings};

use crate::models::ConversationId;

/// Skill listings collection.
pub const LISTINGS: &str = "Skills";
/// Teacher ratings collection.
pub const RATINGS: &str = "Ratings";
/// Conversation documents collection.
pub const CHATS: &str = "Chats";

/// Message subcollection of a conversation.
pub fn messages_path(id: &ConversationId) -> String {
    format!("{}/{}/messages", CHATS, id)
}

/// Last-read watermark subcollection of a conversation.
pub fn last_read_path(id: &ConversationId) -> String {
    format!("{}/{}/lastRead", CHATS, id)
}
