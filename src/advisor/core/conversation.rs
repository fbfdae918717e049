//! The durable conversation record.
//!
//! A conversation binds a caller to a provider chat session identifier.
//! Every conversation has exactly one owner, set at creation and never
//! reassigned; it is visible and usable only by that owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::advisor::core::ids::{ConversationId, UserId};

/// A durable conversation owned by a single caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Opaque conversation identifier, immutable once created.
    pub id: ConversationId,
    /// The caller who created the conversation.
    pub owner: UserId,
    /// Set at first persistence, immutable.
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a fresh conversation for `owner` with a newly generated id.
    #[must_use]
    pub fn new(owner: UserId) -> Self {
        Self {
            id: ConversationId::new(),
            owner,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a conversation from stored fields.
    #[must_use]
    pub const fn from_parts(id: ConversationId, owner: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            created_at,
        }
    }

    /// Whether `caller` owns this conversation.
    #[must_use]
    pub fn is_owned_by(&self, caller: UserId) -> bool {
        self.owner == caller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversations_get_distinct_ids() {
        let owner = UserId::new();
        let a = Conversation::new(owner);
        let b = Conversation::new(owner);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn ownership_is_an_equality_check() {
        let owner = UserId::new();
        let conversation = Conversation::new(owner);
        assert!(conversation.is_owned_by(owner));
        assert!(!conversation.is_owned_by(UserId::new()));
    }
}
