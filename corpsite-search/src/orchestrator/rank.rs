//! Cross-source ranking.

use std::cmp::Ordering;

use crate::sources::Candidate;

/// Sort candidates by score (descending) and keep the best `limit`.
///
/// The sort is stable: candidates with equal scores keep the order they
/// were merged in, which is the fixed source order followed by each
/// source's repository order.
pub fn rank(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.result
            .score
            .partial_cmp(&a.result.score)
            .unwrap_or(Ordering::Equal)
    });
    candidates.truncate(limit);
    candidates
}
