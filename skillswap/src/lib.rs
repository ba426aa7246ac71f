//! Rust client library for SkillSwap, a skill-exchange service.

pub mod api;
pub mod bot;
pub mod client;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;

// Re-export main types
pub use client::{AuthInfo, AuthState, HttpConfig, SkillSwapClient, SkillSwapClientBuilder};
pub use error::{Error, Result};

// Re-export commonly used models
pub use models::{
    ChatBotTurn, Conversation, ConversationId, LastRead, Listing, ListingId, ListingUpdate,
    Message, NewListing, Rating, RatingId, RatingSummary, SkillStatus, TurnRole, UserId,
};

// Re-export API and engine types
pub use api::{Browser, ChatApi, ChatSession, ListingApi, RatingApi, TeacherRatings};
pub use bot::{ChatBot, ReplyEngine, ReplyRule};
pub use engine::{BrowseResult, FilterKind, FilterTag, ListingFilter, StatusFilter};
pub use store::{DocumentStore, MemoryStore, RestStore, Subscription, Watch};
