//! Core advisor types and identifiers.

pub mod config;
pub mod conversation;
pub mod errors;
pub mod ids;

pub use config::AdvisorConfig;
pub use conversation::Conversation;
pub use errors::{AdvisorError, AdvisorResult};
pub use ids::{ConversationId, UserId};
