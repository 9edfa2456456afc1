//! Summary statistics over the final result list.

use std::collections::BTreeMap;

use crate::types::{SearchResult, SearchStats};

/// Count results per domain and compute the rounded mean score.
///
/// Only the returned results are counted. An empty list has an average
/// score of 0.
pub fn compile_stats(results: &[SearchResult]) -> SearchStats {
    let mut by_domain = BTreeMap::new();
    for result in results {
        *by_domain.entry(result.domain).or_insert(0) += 1;
    }

    let avg_score = if results.is_empty() {
        0
    } else {
        let total: f64 = results.iter().map(|r| r.score).sum();
        (total / results.len() as f64).round() as i64
    };

    SearchStats {
        total_results: results.len(),
        by_domain,
        avg_score,
    }
}
