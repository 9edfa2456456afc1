//! Query normalisation.
//!
//! Turns a [`RawQuery`] into a fully-defaulted [`SearchQuery`]. This is the
//! only place that rejects user input: a term shorter than
//! [`MIN_TERM_CHARS`] after trimming fails with
//! [`SearchError::InvalidQuery`] before any source is touched.

use regex::{Regex, RegexBuilder};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::types::{DomainFilter, QueryEcho};

/// Minimum number of characters in a trimmed search term.
pub const MIN_TERM_CHARS: usize = 2;

/// Search words longer than this get a fuzzy subsequence pattern.
const MIN_FUZZY_WORD_CHARS: usize = 4;

/// An unvalidated search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    /// The term as typed by the user.
    pub term: String,
    /// The `type` parameter: `all`, a source or a domain name.
    pub filter: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Enables the fuzzy subsequence pass.
    pub fuzzy: Option<bool>,
}

impl RawQuery {
    /// Create a raw query with every option unset.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    /// Restrict the search to a source or domain name.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Enable or disable fuzzy matching.
    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }
}

/// A validated, normalised search query.
///
/// The term is trimmed and lowercased for matching; search words and fuzzy
/// patterns are derived once here so scoring never re-parses the term.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    term: String,
    display_term: String,
    filter: DomainFilter,
    limit: usize,
    fuzzy: bool,
    words: Vec<String>,
    fuzzy_patterns: Vec<Regex>,
}

impl SearchQuery {
    /// Validate and normalise a raw query.
    ///
    /// Defaults: `limit` to `config.default_limit`, filter to
    /// [`DomainFilter::All`], fuzzy to `false`. A requested limit above
    /// `config.max_limit` is clamped; a limit of 0 is kept and yields an
    /// empty result list.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] if the trimmed term has fewer
    /// than [`MIN_TERM_CHARS`] characters.
    pub fn parse(raw: RawQuery, config: &SearchConfig) -> Result<Self> {
        let display_term = raw.term.trim().to_owned();
        if display_term.chars().count() < MIN_TERM_CHARS {
            return Err(SearchError::InvalidQuery(format!(
                "search term must be at least {MIN_TERM_CHARS} characters"
            )));
        }

        let term = display_term.to_lowercase();
        let words: Vec<String> = term.split_whitespace().map(str::to_owned).collect();
        let fuzzy = raw.fuzzy.unwrap_or(false);
        let fuzzy_patterns = if fuzzy {
            words
                .iter()
                .filter(|w| w.chars().count() >= MIN_FUZZY_WORD_CHARS)
                .map(|w| fuzzy_pattern(w))
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        let limit = raw
            .limit
            .unwrap_or(config.default_limit)
            .min(config.max_limit);
        let filter = raw
            .filter
            .as_deref()
            .map(DomainFilter::parse)
            .unwrap_or_default();

        Ok(Self {
            term,
            display_term,
            filter,
            limit,
            fuzzy,
            words,
            fuzzy_patterns,
        })
    }

    /// Trimmed, lowercased term used for matching.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Trimmed term in its original case.
    pub fn display_term(&self) -> &str {
        &self.display_term
    }

    /// Which domains may be returned.
    pub fn filter(&self) -> &DomainFilter {
        &self.filter
    }

    /// Maximum number of results.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether the fuzzy pass is enabled.
    pub fn fuzzy(&self) -> bool {
        self.fuzzy
    }

    /// Whitespace-separated words of the lowercased term.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Compiled subsequence patterns, empty unless fuzzy is enabled.
    pub fn fuzzy_patterns(&self) -> &[Regex] {
        &self.fuzzy_patterns
    }

    /// The query as reported back in responses.
    pub fn echo(&self) -> QueryEcho {
        QueryEcho {
            term: self.display_term.clone(),
            filter: self.filter.to_string(),
            fuzzy: self.fuzzy,
            limit: self.limit,
        }
    }
}

/// Build a case-insensitive pattern matching `word`'s characters in order,
/// with anything (except newlines) in between.
fn fuzzy_pattern(word: &str) -> Result<Regex> {
    let pattern = word
        .chars()
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(".*");
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| SearchError::Internal(format!("failed to build fuzzy pattern: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, SourceKind};

    fn parse(raw: RawQuery) -> Result<SearchQuery> {
        SearchQuery::parse(raw, &SearchConfig::default())
    }

    #[test]
    fn empty_term_rejected() {
        let err = parse(RawQuery::new("")).unwrap_err();
        assert!(err.is_invalid_query());
    }

    #[test]
    fn single_char_after_trim_rejected() {
        let err = parse(RawQuery::new(" a ")).unwrap_err();
        assert!(err.is_invalid_query());
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn whitespace_only_rejected() {
        assert!(parse(RawQuery::new("     ")).is_err());
    }

    #[test]
    fn two_chars_accepted() {
        let query = parse(RawQuery::new("ab")).expect("valid");
        assert_eq!(query.term(), "ab");
    }

    #[test]
    fn multibyte_term_counts_characters() {
        // "ñú" is two characters but four bytes.
        assert!(parse(RawQuery::new("ñú")).is_ok());
        assert!(parse(RawQuery::new(" ñ ")).is_err());
    }

    #[test]
    fn term_trimmed_and_lowercased() {
        let query = parse(RawQuery::new("  Torre Azul ")).expect("valid");
        assert_eq!(query.term(), "torre azul");
        assert_eq!(query.display_term(), "Torre Azul");
        assert_eq!(query.words(), &["torre".to_string(), "azul".to_string()]);
    }

    #[test]
    fn defaults_applied() {
        let query = parse(RawQuery::new("lima")).expect("valid");
        assert_eq!(query.limit(), 50);
        assert_eq!(query.filter(), &DomainFilter::All);
        assert!(!query.fuzzy());
        assert!(query.fuzzy_patterns().is_empty());
    }

    #[test]
    fn limit_clamped_to_max() {
        let query = parse(RawQuery::new("lima").with_limit(10_000)).expect("valid");
        assert_eq!(query.limit(), 500);
    }

    #[test]
    fn zero_limit_kept() {
        let query = parse(RawQuery::new("lima").with_limit(0)).expect("valid");
        assert_eq!(query.limit(), 0);
    }

    #[test]
    fn filter_parsed() {
        let query = parse(RawQuery::new("lima").with_filter("careers")).expect("valid");
        assert_eq!(query.filter(), &DomainFilter::Source(SourceKind::Careers));

        let query = parse(RawQuery::new("lima").with_filter("page")).expect("valid");
        assert_eq!(query.filter(), &DomainFilter::Domain(Domain::Page));
    }

    #[test]
    fn fuzzy_patterns_only_for_long_words() {
        let query = parse(RawQuery::new("de sur lima").with_fuzzy(true)).expect("valid");
        // "de" and "sur" are too short; "lima" has four characters.
        assert_eq!(query.fuzzy_patterns().len(), 1);
        assert!(query.fuzzy_patterns()[0].is_match("L-I-M-A"));
        assert!(!query.fuzzy_patterns()[0].is_match("mali"));

        let query = parse(RawQuery::new("de obra lima").with_fuzzy(true)).expect("valid");
        assert_eq!(query.fuzzy_patterns().len(), 2);
    }

    #[test]
    fn fuzzy_pattern_escapes_metacharacters() {
        let query = parse(RawQuery::new("c++x").with_fuzzy(true)).expect("valid");
        let pattern = &query.fuzzy_patterns()[0];
        assert!(pattern.is_match("c and + and + and x"));
        assert!(!pattern.is_match("cccx"));
    }

    #[test]
    fn fuzzy_pattern_does_not_cross_newlines() {
        let query = parse(RawQuery::new("lima").with_fuzzy(true)).expect("valid");
        assert!(!query.fuzzy_patterns()[0].is_match("li\nma"));
    }

    #[test]
    fn echo_reports_display_term() {
        let query = parse(
            RawQuery::new(" Torre ")
                .with_filter("portfolio")
                .with_limit(5)
                .with_fuzzy(true),
        )
        .expect("valid");
        let echo = query.echo();
        assert_eq!(echo.term, "Torre");
        assert_eq!(echo.filter, "portfolio");
        assert_eq!(echo.limit, 5);
        assert!(echo.fuzzy);
    }
}
