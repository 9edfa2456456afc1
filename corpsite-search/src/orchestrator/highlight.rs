//! Second-pass field highlighting.
//!
//! Runs only over the candidates that survived ranking, so records cut by
//! the limit are never re-scored.

use crate::query::SearchQuery;
use crate::sources::Candidate;
use crate::types::SearchResult;

/// Fill `highlighted_fields` for each ranked candidate and return the
/// public results in the same order.
pub fn highlight(ranked: Vec<Candidate>, query: &SearchQuery) -> Vec<SearchResult> {
    ranked
        .into_iter()
        .map(|candidate| {
            let mut result = candidate.result;
            result.highlighted_fields = candidate.entity.highlighted_fields(query);
            result
        })
        .collect()
}
