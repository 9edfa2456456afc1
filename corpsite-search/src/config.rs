//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls result limits and how long a single content
//! source may take before it is treated as unavailable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Configuration for the search engine.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Result limit applied when the request does not specify one.
    pub default_limit: usize,
    /// Upper bound for a requested limit. Larger requests are clamped.
    pub max_limit: usize,
    /// Per-source timeout in milliseconds. A source that exceeds it
    /// contributes no results.
    pub source_timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 500,
            source_timeout_ms: 5_000,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `default_limit` must be greater than 0
    /// - `max_limit` must be >= `default_limit`
    /// - `source_timeout_ms` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.default_limit == 0 {
            return Err(SearchError::Config(
                "default_limit must be greater than 0".into(),
            ));
        }
        if self.max_limit < self.default_limit {
            return Err(SearchError::Config(
                "max_limit must be >= default_limit".into(),
            ));
        }
        if self.source_timeout_ms == 0 {
            return Err(SearchError::Config(
                "source_timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// The per-source timeout as a [`Duration`].
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }
}
