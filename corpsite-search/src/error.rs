//! Error types for the corpsite-search crate.
//!
//! All errors use stable string messages suitable for display to users.
//! [`SearchError::error_code`] provides the machine-readable code that the
//! HTTP layer reports alongside the message.

use crate::repository::RepositoryError;
use crate::types::SourceKind;

/// Errors that can end a search request.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request failed validation. No source was queried.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The search was cancelled before all sources answered.
    #[error("search cancelled")]
    Cancelled,

    /// Unexpected failure inside the engine.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// Machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Config(_) | Self::Cancelled | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller caused this error (as opposed to the engine).
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }
}

/// Convenience type alias for corpsite-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Failure of a single content source.
///
/// Never surfaces to callers: the orchestrator logs it, records the source
/// as degraded and carries on with zero candidates from that source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The backing repository call failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The source did not answer within the configured timeout.
    #[error("source timed out after {0} ms")]
    Timeout(u64),

    /// No repository has been registered for this source.
    #[error("no repository registered for {0}")]
    Unavailable(SourceKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_query() {
        let err = SearchError::InvalidQuery("term too short".into());
        assert_eq!(err.to_string(), "invalid query: term too short");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("default_limit must be > 0".into());
        assert_eq!(err.to_string(), "config error: default_limit must be > 0");
    }

    #[test]
    fn display_cancelled() {
        assert_eq!(SearchError::Cancelled.to_string(), "search cancelled");
    }

    #[test]
    fn error_codes() {
        assert_eq!(
            SearchError::InvalidQuery("x".into()).error_code(),
            "INVALID_QUERY"
        );
        assert_eq!(SearchError::Internal("x".into()).error_code(), "INTERNAL_ERROR");
        assert_eq!(SearchError::Cancelled.error_code(), "INTERNAL_ERROR");
        assert_eq!(SearchError::Config("x".into()).error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn only_invalid_query_is_caller_error() {
        assert!(SearchError::InvalidQuery("x".into()).is_invalid_query());
        assert!(!SearchError::Internal("x".into()).is_invalid_query());
    }

    #[test]
    fn source_error_wraps_repository_message() {
        let err = SourceError::from(RepositoryError::new("pages.json missing"));
        assert_eq!(err.to_string(), "repository error: pages.json missing");
    }

    #[test]
    fn display_source_timeout_and_unavailable() {
        assert_eq!(
            SourceError::Timeout(250).to_string(),
            "source timed out after 250 ms"
        );
        assert_eq!(
            SourceError::Unavailable(SourceKind::Careers).to_string(),
            "no repository registered for careers"
        );
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
        assert_send_sync::<SourceError>();
    }
}
