//! Shared handlers for CLI and MCP.

pub mod bot;
pub mod chat;
pub mod listing;
pub mod rating;
