//! Generative-model provider abstraction and the Gemini implementation.

pub mod gemini;

pub use gemini::GeminiClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::advisor::core::errors::AdvisorResult;

/// An in-memory, multi-turn chat handle held by the provider.
///
/// Sessions are transient: they live for the process lifetime and are
/// recreated from scratch after a restart.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Forward one user prompt and return the model's text response.
    ///
    /// # Errors
    /// Returns an error if the provider call fails or yields unusable data.
    async fn send(&self, prompt: &str) -> AdvisorResult<String>;

    /// Number of turns accumulated in this session (user and model).
    async fn history_len(&self) -> usize;
}

/// Capability to mint chat sessions against the model provider.
pub trait ChatProvider: Send + Sync {
    /// Construct a new chat session with the provider's fixed configuration.
    ///
    /// Construction must be purely local: no remote resource may be created
    /// until the first `send`, so a session built and then discarded by the
    /// loser of a creation race has no side effects.
    ///
    /// # Errors
    /// Returns an error if the session cannot be constructed.
    fn create_session(&self) -> AdvisorResult<Arc<dyn ChatSession>>;
}
