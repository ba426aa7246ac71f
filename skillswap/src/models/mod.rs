//! Data models for SkillSwap documents.

mod chatbot;
mod conversation;
mod ids;
mod listing;
mod rating;

pub use chatbot::{ChatBotTurn, TurnRole};
pub use conversation::{Conversation, LastRead, Message};
pub use ids::{ConversationId, ListingId, RatingId, UserId};
pub use listing::{Listing, ListingUpdate, NewListing, SkillStatus};
pub use rating::{Rating, RatingSummary};
