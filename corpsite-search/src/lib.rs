//! # corpsite-search
//!
//! Federated relevance search across the corporate site's content domains.
//!
//! This crate scans pages, portfolio, careers and newsletter content on
//! demand, scores every record against a per-domain field table and returns
//! one ranked list. It has no HTTP surface and reads no files: content comes
//! from an injected [`ContentRepository`] and outcomes go to an
//! [`AuditSink`].
//!
//! ## Design
//!
//! - One adapter per source, all queried concurrently with a per-source timeout
//! - Scoring is additive: exact substring, word overlap and optional fuzzy
//!   subsequence passes, each multiplied by the field's boost
//! - A stable sort keeps the fixed source order between equal scores
//! - Highlighting runs only on the results that are returned
//! - Graceful degradation: a failing source contributes nothing and is
//!   listed in the outcome, the others still return results
//!
//! ## Security
//!
//! - No network listeners. This is a library, not a server
//! - Search terms are logged only at debug or trace level
//! - Regex patterns are built from escaped characters only

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod query;
pub mod repository;
pub mod scoring;
pub mod sources;
pub mod types;

use std::sync::Arc;

pub use audit::{AuditEvent, AuditSink, TracingAuditSink};
pub use config::SearchConfig;
pub use engine::{SiteSearch, SiteSearchBuilder};
pub use error::{Result, SearchError, SourceError};
pub use query::{RawQuery, SearchQuery};
pub use repository::{ContentRepository, MemoryRepository, RepositoryError};
pub use sources::SourceAdapter;
pub use types::{
    Domain, DomainFilter, QueryEcho, SearchOutcome, SearchResult, SearchStats, SourceKind,
};

/// Search every source of a single shared repository.
///
/// Builds a throwaway [`SiteSearch`] with `repository` registered for all
/// sources and the default [`TracingAuditSink`], then runs `raw`.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid, or
/// [`SearchError::InvalidQuery`] if the term is too short.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> corpsite_search::Result<()> {
/// use std::sync::Arc;
/// use corpsite_search::{MemoryRepository, RawQuery, SearchConfig};
///
/// let repository = Arc::new(MemoryRepository::new());
/// let outcome = corpsite_search::search(
///     RawQuery::new("construcción").with_limit(10),
///     repository,
///     &SearchConfig::default(),
/// )
/// .await?;
/// for result in &outcome.results {
///     println!("{} {}: {}", result.score, result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    raw: RawQuery,
    repository: Arc<dyn ContentRepository>,
    config: &SearchConfig,
) -> Result<SearchOutcome> {
    SiteSearch::builder()
        .config(config.clone())
        .repository_for_all(repository)
        .build()?
        .search(raw)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_validates_config_zero_default_limit() {
        let config = SearchConfig {
            default_limit: 0,
            ..Default::default()
        };
        let result = search(RawQuery::new("obras"), Arc::new(MemoryRepository::new()), &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("default_limit"));
    }

    #[tokio::test]
    async fn search_validates_config_zero_timeout() {
        let config = SearchConfig {
            source_timeout_ms: 0,
            ..Default::default()
        };
        let result = search(RawQuery::new("obras"), Arc::new(MemoryRepository::new()), &config).await;
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn search_over_empty_repository_is_empty() {
        let outcome = search(
            RawQuery::new("obras"),
            Arc::new(MemoryRepository::new()),
            &SearchConfig::default(),
        )
        .await
        .expect("search");
        assert!(outcome.results.is_empty());
        assert!(outcome.degraded.is_empty());
        assert_eq!(outcome.stats.total_results, 0);
    }
}
