//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::advisor::core::config::AdvisorConfig;
use crate::advisor::core::errors::AdvisorResult;
use crate::advisor::engine::SessionBinder;
use crate::advisor::storage::conversation_store::SqliteConversationStore;
use crate::llm::GeminiClient;

/// Shared application state.
pub struct AppState {
    /// Session binder handling conversation resolution and provider calls.
    pub binder: SessionBinder,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid, the database cannot
    /// be opened or the Gemini client cannot be built.
    pub async fn new(config: AdvisorConfig) -> AdvisorResult<Arc<Self>> {
        config.validate()?;

        let store = Arc::new(SqliteConversationStore::new(&config).await?);
        let provider = Arc::new(GeminiClient::new(&config)?);
        let binder = SessionBinder::new(store, provider);

        Ok(Arc::new(Self { binder }))
    }

    /// Create the application state from environment variables.
    ///
    /// # Errors
    /// Returns an error if the environment yields an invalid configuration.
    pub async fn from_env() -> AdvisorResult<Arc<Self>> {
        Self::new(AdvisorConfig::from_env()).await
    }
}
