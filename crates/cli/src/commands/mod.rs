//! Command handlers for the doctalk CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod search;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use search::SearchCommand;
