//! Field-weighted relevance scoring.
//!
//! Each searchable field contributes the sum of three passes, all
//! multiplied by the field's boost:
//!
//! ```text
//! exact    +10  lowercased text contains the whole term
//! overlap  +3   per (search word, text word) pair where the text word
//!               contains the search word and the search word has > 2 chars
//! fuzzy    +1   per search word with > 3 chars whose letters appear in
//!               order in the text (only when fuzzy matching is on)
//! ```
//!
//! The overlap pass is a full cross product: a search word that hits
//! several words of a long field counts once per hit.

use std::borrow::Cow;

use crate::query::SearchQuery;

/// Points for an exact substring match of the whole term.
pub const EXACT_MATCH_POINTS: f64 = 10.0;
/// Points per search word / text word overlap.
pub const WORD_MATCH_POINTS: f64 = 3.0;
/// Points per fuzzy subsequence match.
pub const FUZZY_MATCH_POINTS: f64 = 1.0;

/// Search words need at least this many characters to count for overlap.
const MIN_OVERLAP_WORD_CHARS: usize = 3;

/// A named, weighted text accessor on a record of type `T`.
///
/// `extract` returns `None` for absent or empty values, which score 0.
pub struct SearchableField<T> {
    /// Field name reported in `highlightedFields`.
    pub name: &'static str,
    /// Multiplier applied to every pass for this field.
    pub boost: f64,
    /// Produces the field's text. Lists are space-joined.
    pub extract: fn(&T) -> Option<Cow<'_, str>>,
}

/// Score a single piece of text against the query.
pub fn score_text(text: &str, boost: f64, query: &SearchQuery) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let haystack = text.to_lowercase();
    let mut score = 0.0;

    if haystack.contains(query.term()) {
        score += EXACT_MATCH_POINTS * boost;
    }

    let text_words: Vec<&str> = haystack.split_whitespace().collect();
    for word in query
        .words()
        .iter()
        .filter(|w| w.chars().count() >= MIN_OVERLAP_WORD_CHARS)
    {
        let hits = text_words
            .iter()
            .filter(|tw| tw.contains(word.as_str()))
            .count();
        score += WORD_MATCH_POINTS * boost * hits as f64;
    }

    for pattern in query.fuzzy_patterns() {
        if pattern.is_match(text) {
            score += FUZZY_MATCH_POINTS * boost;
        }
    }

    score
}

/// Score one field of `record`.
pub fn score_field<T>(record: &T, field: &SearchableField<T>, query: &SearchQuery) -> f64 {
    (field.extract)(record).map_or(0.0, |text| score_text(&text, field.boost, query))
}

/// Total score of `record` across its field table.
pub fn score_fields<T>(record: &T, fields: &[SearchableField<T>], query: &SearchQuery) -> f64 {
    fields
        .iter()
        .map(|field| score_field(record, field, query))
        .sum()
}

/// Names of the fields that score above zero on their own, in table order.
pub fn matching_fields<T>(
    record: &T,
    fields: &[SearchableField<T>],
    query: &SearchQuery,
) -> Vec<String> {
    fields
        .iter()
        .filter(|field| score_field(record, field, query) > 0.0)
        .map(|field| field.name.to_owned())
        .collect()
}

/// Borrow `value` as field text, treating blank strings as absent.
pub fn text(value: &str) -> Option<Cow<'_, str>> {
    if value.trim().is_empty() {
        None
    } else {
        Some(Cow::Borrowed(value))
    }
}

/// Space-join a list of strings into field text.
pub fn joined(values: &[String]) -> Option<Cow<'static, str>> {
    let joined = values.join(" ");
    if joined.trim().is_empty() {
        None
    } else {
        Some(Cow::Owned(joined))
    }
}
