//! Corporate site search service.
//!
//! Hosts the [`corpsite_search`] engine behind an HTTP API:
//! TOML config → JSON content files → federated search → JSON envelope.
//!
//! # Architecture
//!
//! - **Config**: [`config::SiteConfig`], one TOML file with per-section defaults
//! - **Content**: [`repository::JsonFileRepository`], one JSON file per domain
//! - **Audit**: [`audit::JsonlAuditLog`], append-only JSONL written off the request path
//! - **HTTP**: [`server`], axum router for `GET /api/search` and `GET /health`

pub mod audit;
pub mod config;
pub mod error;
pub mod repository;
pub mod server;
pub mod site_dirs;

use std::sync::Arc;

use corpsite_search::{AuditSink, SiteSearch, TracingAuditSink};
use tokio::task::JoinHandle;

pub use config::SiteConfig;
pub use error::{Result, SiteError};

/// Build the search engine described by `config`.
///
/// Every source reads from a [`repository::JsonFileRepository`] rooted at
/// `content.data_dir`. When auditing is enabled the JSONL writer task is
/// started and its handle returned; await it after the engine is dropped
/// to flush pending events.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn build_engine(config: &SiteConfig) -> Result<(SiteSearch, Option<JoinHandle<()>>)> {
    config.validate()?;

    let repository = Arc::new(repository::JsonFileRepository::new(
        config.content.data_dir.clone(),
    ));
    if !repository.data_dir().is_dir() {
        tracing::warn!(
            path = %repository.data_dir().display(),
            "content directory does not exist, every collection will be empty"
        );
    }

    let (sink, writer) = if config.audit.enabled {
        let (log, handle) = audit::JsonlAuditLog::spawn(config.audit.path.clone());
        (Arc::new(log) as Arc<dyn AuditSink>, Some(handle))
    } else {
        (Arc::new(TracingAuditSink) as Arc<dyn AuditSink>, None)
    };

    let engine = SiteSearch::builder()
        .config(config.search.clone())
        .repository_for_all(repository)
        .audit(sink)
        .build()?;
    Ok((engine, writer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_engine_rejects_invalid_search_config() {
        let mut config = SiteConfig::default();
        config.search.source_timeout_ms = 0;
        let err = build_engine(&config).expect_err("invalid");
        assert!(matches!(err, SiteError::Search(_)));
    }

    #[tokio::test]
    async fn build_engine_without_audit_has_no_writer() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = SiteConfig::default();
        config.content.data_dir = dir.path().to_path_buf();
        config.audit.enabled = false;

        let (engine, writer) = build_engine(&config).expect("build");
        assert!(writer.is_none());
        assert_eq!(engine.config(), &config.search);
    }
}
