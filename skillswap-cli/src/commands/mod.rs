//! CLI subcommands.

pub mod bot;
pub mod chat;
pub mod listing;
pub mod rating;
