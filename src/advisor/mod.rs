//! Advisor subsystem for the Oriento API.
//!
//! Organized into:
//! - `core`: Configuration, errors, IDs and the conversation entity
//! - `storage`: Conversation repository with a `SQLite` backend
//! - `prompt`: The Oriento system instruction
//! - `engine`: The session binder tying conversations to provider sessions

pub mod core;
pub mod engine;
pub mod prompt;
pub mod storage;

// Re-export commonly used types for convenience
pub use self::core::{
    AdvisorConfig, AdvisorError, AdvisorResult, Conversation, ConversationId, UserId,
};
pub use engine::{AdvisorReply, SessionBinder};
pub use storage::{ConversationStore, SqliteConversationStore};
