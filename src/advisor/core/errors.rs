//! Error types for the advisor service.

use thiserror::Error;

/// Advisor service error type.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No conversation exists for the supplied identifier.
    #[error("conversation not found: {0}")]
    ConversationNotFound(String),
    /// The conversation belongs to a different caller.
    #[error("conversation {0} does not belong to the authenticated caller")]
    PermissionDenied(String),
    /// The model provider failed or returned unusable data.
    #[error("upstream provider error: {0}")]
    Upstream(String),
    /// HTTP client error talking to the provider.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    /// `SQLite` storage error (sync).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// `SQLite` storage error (async).
    #[error("tokio-rusqlite error: {0}")]
    TokioSqlite(#[from] tokio_rusqlite::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdvisorError {
    /// Whether the failure was caused by the caller rather than the service.
    ///
    /// NotFound and PermissionDenied map to client errors; provider and
    /// storage failures map to server errors.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::ConversationNotFound(_) | Self::PermissionDenied(_)
        )
    }
}

/// Convenience result alias for advisor operations.
pub type AdvisorResult<T> = Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_failures_are_client_errors() {
        assert!(AdvisorError::ConversationNotFound("x".into()).is_client_error());
        assert!(AdvisorError::PermissionDenied("x".into()).is_client_error());
        assert!(!AdvisorError::Upstream("boom".into()).is_client_error());
    }
}
