//! Core search orchestrator: concurrent per-source fan-out, rank, highlight, stats.
//!
//! Queries every admitted source concurrently, each under its own timeout,
//! merges the candidates in the fixed source order, ranks and truncates them,
//! then highlights the survivors and compiles statistics.

use std::sync::Arc;

use crate::config::SearchConfig;
use crate::error::SourceError;
use crate::query::SearchQuery;
use crate::repository::ContentRepository;
use crate::sources::{
    Candidate, CareersSource, NewsletterSource, PagesSource, PortfolioSource, SourceAdapter,
    SourceRegistry,
};
use crate::types::{SearchOutcome, SourceKind};

use super::highlight::highlight;
use super::rank::rank;
use super::stats::compile_stats;

/// Orchestrate a search across every source the query's filter admits.
///
/// # Pipeline
///
/// 1. Select the sources admitted by the filter, in [`SourceKind::all`] order
/// 2. Fan out concurrently with [`futures::future::join_all`], each source
///    wrapped in [`tokio::time::timeout`]
/// 3. Log per-source errors at warn level and record the source as degraded
/// 4. Merge candidates in source order
/// 5. Stable-sort by score (descending) and truncate to the query limit
/// 6. Highlight the surviving results
/// 7. Compile statistics from the final list
///
/// A failing source never fails the search. If every source fails the
/// outcome is simply empty, with all of them listed in `degraded`.
pub async fn orchestrate_search(
    query: &SearchQuery,
    registry: &SourceRegistry,
    config: &SearchConfig,
) -> SearchOutcome {
    let timeout = config.source_timeout();

    // 1-2. Fan out to admitted sources concurrently.
    let futures: Vec<_> = SourceKind::all()
        .iter()
        .copied()
        .filter(|kind| query.filter().admits_source(*kind))
        .map(|kind| {
            let repository = registry.get(&kind).cloned();
            async move {
                let outcome = match repository {
                    Some(repository) => {
                        match tokio::time::timeout(timeout, query_source(kind, repository, query))
                            .await
                        {
                            Ok(outcome) => outcome,
                            Err(_) => Err(SourceError::Timeout(config.source_timeout_ms)),
                        }
                    }
                    None => Err(SourceError::Unavailable(kind)),
                };
                (kind, outcome)
            }
        })
        .collect();

    let outcomes = futures::future::join_all(futures).await;

    // 3-4. Merge in source order, logging failures.
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut degraded: Vec<SourceKind> = Vec::new();

    for (kind, outcome) in outcomes {
        match outcome {
            Ok(found) => {
                tracing::debug!(source = %kind, count = found.len(), "source returned candidates");
                candidates.extend(found);
            }
            Err(err) => {
                tracing::warn!(source = %kind, error = %err, "source query failed");
                degraded.push(kind);
            }
        }
    }

    // 5. Rank and truncate.
    let ranked = rank(candidates, query.limit());

    // 6. Highlight only what is returned.
    let results = highlight(ranked, query);

    // 7. Stats over the final list.
    let stats = compile_stats(&results);

    SearchOutcome {
        results,
        stats,
        query: query.echo(),
        degraded,
    }
}

/// Query a single source, dispatching to the concrete adapter.
async fn query_source(
    kind: SourceKind,
    repository: Arc<dyn ContentRepository>,
    query: &SearchQuery,
) -> Result<Vec<Candidate>, SourceError> {
    match kind {
        SourceKind::Pages => PagesSource::new(repository).fetch_candidates(query).await,
        SourceKind::Portfolio => PortfolioSource::new(repository).fetch_candidates(query).await,
        SourceKind::Careers => CareersSource::new(repository).fetch_candidates(query).await,
        SourceKind::Newsletter => NewsletterSource::new(repository).fetch_candidates(query).await,
    }
}
