//! The [`SiteSearch`] facade: repositories, config and audit sink wired together.
//!
//! A [`SiteSearch`] owns one [`ContentRepository`] per [`SourceKind`], a
//! validated [`SearchConfig`] and an [`AuditSink`]. It normalises raw
//! requests, runs the orchestrator and reports each outcome to the sink.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::audit::{AuditEvent, AuditSink, TracingAuditSink};
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::orchestrator::search::orchestrate_search;
use crate::query::{RawQuery, SearchQuery};
use crate::repository::ContentRepository;
use crate::sources::SourceRegistry;
use crate::types::{SearchOutcome, SourceKind};

/// Federated search over the site's content sources.
///
/// Cheap to share behind an [`Arc`]; every search borrows it immutably.
pub struct SiteSearch {
    config: SearchConfig,
    registry: SourceRegistry,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for SiteSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sources: Vec<_> = self.registry.keys().copied().collect();
        sources.sort();
        f.debug_struct("SiteSearch")
            .field("config", &self.config)
            .field("sources", &sources)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SiteSearch`].
pub struct SiteSearchBuilder {
    config: SearchConfig,
    registry: SourceRegistry,
    audit: Option<Arc<dyn AuditSink>>,
}

impl SiteSearchBuilder {
    /// Use `config` instead of [`SearchConfig::default`].
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the repository backing one source.
    pub fn repository(mut self, kind: SourceKind, repository: Arc<dyn ContentRepository>) -> Self {
        self.registry.insert(kind, repository);
        self
    }

    /// Register one repository for every source.
    pub fn repository_for_all(mut self, repository: Arc<dyn ContentRepository>) -> Self {
        for kind in SourceKind::all() {
            self.registry.insert(*kind, Arc::clone(&repository));
        }
        self
    }

    /// Send audit events to `sink`. Defaults to [`TracingAuditSink`].
    pub fn audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Validate the configuration and build the engine.
    ///
    /// Sources without a repository are allowed; searches report them as
    /// degraded.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid.
    pub fn build(self) -> Result<SiteSearch> {
        self.config.validate()?;
        for kind in SourceKind::all() {
            if !self.registry.contains_key(kind) {
                tracing::warn!(source = %kind, "no repository registered, source will be skipped");
            }
        }
        Ok(SiteSearch {
            config: self.config,
            registry: self.registry,
            audit: self
                .audit
                .unwrap_or_else(|| Arc::new(TracingAuditSink) as Arc<dyn AuditSink>),
        })
    }
}

impl SiteSearch {
    /// Start building an engine with default configuration and no sources.
    pub fn builder() -> SiteSearchBuilder {
        SiteSearchBuilder {
            config: SearchConfig::default(),
            registry: SourceRegistry::new(),
            audit: None,
        }
    }

    /// The validated configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run a search.
    ///
    /// Dropping the returned future drops every in-flight source call.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] if the term is too short; no
    /// source is queried in that case. Source failures are not errors: they
    /// are listed in [`SearchOutcome::degraded`].
    pub async fn search(&self, raw: RawQuery) -> Result<SearchOutcome> {
        let term = raw.term.clone();
        let query = self.normalise(raw, &term)?;
        let outcome = orchestrate_search(&query, &self.registry, &self.config).await;
        self.record_completed(&query, &outcome);
        Ok(outcome)
    }

    /// Run a search that stops early when `cancel` fires.
    ///
    /// # Errors
    ///
    /// Same as [`SiteSearch::search`], plus [`SearchError::Cancelled`] if
    /// the token is cancelled before the search completes.
    pub async fn search_with_cancel(
        &self,
        raw: RawQuery,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome> {
        let term = raw.term.clone();
        let query = self.normalise(raw, &term)?;

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                let err = SearchError::Cancelled;
                self.record_failed(&term, &err);
                Err(err)
            }
            outcome = orchestrate_search(&query, &self.registry, &self.config) => {
                self.record_completed(&query, &outcome);
                Ok(outcome)
            }
        }
    }

    fn normalise(&self, raw: RawQuery, term: &str) -> Result<SearchQuery> {
        match SearchQuery::parse(raw, &self.config) {
            Ok(query) => {
                tracing::debug!(
                    term = %query.display_term(),
                    filter = %query.filter(),
                    limit = query.limit(),
                    fuzzy = query.fuzzy(),
                    "search started"
                );
                Ok(query)
            }
            Err(err) => {
                if err.is_invalid_query() {
                    tracing::debug!(error = %err, "rejected search request");
                } else {
                    self.record_failed(term, &err);
                }
                Err(err)
            }
        }
    }

    fn record_completed(&self, query: &SearchQuery, outcome: &SearchOutcome) {
        self.audit.record(AuditEvent::SearchCompleted {
            term: query.display_term().to_owned(),
            filter: query.filter().to_string(),
            result_count: outcome.results.len(),
            fuzzy: query.fuzzy(),
        });
    }

    fn record_failed(&self, term: &str, err: &SearchError) {
        self.audit.record(AuditEvent::SearchFailed {
            term: term.to_owned(),
            error_code: err.error_code().to_owned(),
            message: err.to_string(),
        });
    }
}
