//! Error types for the search service host.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search engine error.
    #[error(transparent)]
    Search(#[from] corpsite_search::SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_pass_through_unchanged() {
        let err = SiteError::from(corpsite_search::SearchError::Config(
            "max_limit must be >= default_limit".into(),
        ));
        assert_eq!(
            err.to_string(),
            "config error: max_limit must be >= default_limit"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err = SiteError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
