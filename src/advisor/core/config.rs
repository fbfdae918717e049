//! Configuration for the advisor service.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::advisor::core::errors::{AdvisorError, AdvisorResult};

/// Default Gemini model name.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the Gemini API key.
const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model name.
const MODEL_ENV: &str = "ORIENTO_MODEL";
/// Environment variable overriding the Gemini base URL.
const BASE_URL_ENV: &str = "ORIENTO_GEMINI_URL";
/// Environment variable overriding the `SQLite` database path.
const DB_PATH_ENV: &str = "ORIENTO_DB_PATH";

/// Top-level configuration for the advisor service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Gemini model name.
    pub model: String,
    /// Gemini API key.
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// Gemini API base URL.
    pub base_url: String,
    /// `SQLite` database path.
    pub sqlite_path: PathBuf,
    /// Conversation table name.
    pub conversation_table: String,
    /// Connect timeout for provider calls, in seconds.
    pub connect_timeout_seconds: u64,
    /// Overall timeout for provider calls, in seconds.
    pub request_timeout_seconds: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            sqlite_path: PathBuf::from("oriento.sqlite"),
            conversation_table: "gemini_conversation".to_string(),
            connect_timeout_seconds: 5,
            request_timeout_seconds: 120,
        }
    }
}

impl AdvisorConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.model = model;
        }
        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            config.api_key = api_key;
        }
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            config.sqlite_path = PathBuf::from(path);
        }
        config
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> AdvisorResult<()> {
        if self.model.trim().is_empty() {
            return Err(AdvisorError::InvalidConfig(
                "model must not be empty".to_string(),
            ));
        }

        if self.api_key.trim().is_empty() {
            return Err(AdvisorError::InvalidConfig(format!(
                "api_key must be set (env {API_KEY_ENV})"
            )));
        }

        if self.conversation_table.trim().is_empty() {
            return Err(AdvisorError::InvalidConfig(
                "conversation_table must not be empty".to_string(),
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err(AdvisorError::InvalidConfig(
                "request_timeout_seconds must be > 0".to_string(),
            ));
        }

        Url::parse(&self.base_url)?;

        Ok(())
    }
}
