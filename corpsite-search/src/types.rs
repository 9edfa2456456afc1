//! Core types: content domains, source groups, filters and the public result shapes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A content domain with its own storage and schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Static site page.
    Page,
    /// Portfolio project.
    PortfolioProject,
    /// Portfolio category.
    PortfolioCategory,
    /// Job posting.
    CareerJob,
    /// Careers department.
    CareerDepartment,
    /// Newsletter article.
    NewsletterArticle,
    /// Newsletter author.
    NewsletterAuthor,
    /// Newsletter category.
    NewsletterCategory,
}

impl Domain {
    /// Stable wire name, also accepted by the `type` filter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::PortfolioProject => "portfolio_project",
            Self::PortfolioCategory => "portfolio_category",
            Self::CareerJob => "career_job",
            Self::CareerDepartment => "career_department",
            Self::NewsletterArticle => "newsletter_article",
            Self::NewsletterAuthor => "newsletter_author",
            Self::NewsletterCategory => "newsletter_category",
        }
    }

    /// The source that owns this domain.
    pub fn source(&self) -> SourceKind {
        match self {
            Self::Page => SourceKind::Pages,
            Self::PortfolioProject | Self::PortfolioCategory => SourceKind::Portfolio,
            Self::CareerJob | Self::CareerDepartment => SourceKind::Careers,
            Self::NewsletterArticle | Self::NewsletterAuthor | Self::NewsletterCategory => {
                SourceKind::Newsletter
            }
        }
    }

    /// Returns all domain variants.
    pub fn all() -> &'static [Domain] {
        &[
            Self::Page,
            Self::PortfolioProject,
            Self::PortfolioCategory,
            Self::CareerJob,
            Self::CareerDepartment,
            Self::NewsletterArticle,
            Self::NewsletterAuthor,
            Self::NewsletterCategory,
        ]
    }

    /// Parse a wire name back to a domain.
    pub fn from_name(name: &str) -> Option<Domain> {
        Self::all().iter().copied().find(|d| d.name() == name)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A group of domains served by one source adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Static pages.
    Pages,
    /// Portfolio projects and categories.
    Portfolio,
    /// Job postings and departments.
    Careers,
    /// Newsletter articles, authors and categories.
    Newsletter,
}

impl SourceKind {
    /// Stable wire name, also accepted by the `type` filter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Portfolio => "portfolio",
            Self::Careers => "careers",
            Self::Newsletter => "newsletter",
        }
    }

    /// Domains owned by this source, in emission order.
    pub fn domains(&self) -> &'static [Domain] {
        match self {
            Self::Pages => &[Domain::Page],
            Self::Portfolio => &[Domain::PortfolioProject, Domain::PortfolioCategory],
            Self::Careers => &[Domain::CareerJob, Domain::CareerDepartment],
            Self::Newsletter => &[
                Domain::NewsletterArticle,
                Domain::NewsletterAuthor,
                Domain::NewsletterCategory,
            ],
        }
    }

    /// All sources in their fixed execution order. Equal scores keep
    /// this order after ranking.
    pub fn all() -> &'static [SourceKind] {
        &[Self::Pages, Self::Portfolio, Self::Careers, Self::Newsletter]
    }

    /// Parse a wire name back to a source.
    pub fn from_name(name: &str) -> Option<SourceKind> {
        Self::all().iter().copied().find(|s| s.name() == name)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Restricts which domains a search covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DomainFilter {
    /// Every domain.
    #[default]
    All,
    /// Every domain of one source.
    Source(SourceKind),
    /// A single domain.
    Domain(Domain),
    /// A name that matches nothing. Admits no domain.
    Unknown(String),
}

impl DomainFilter {
    /// Parse the `type` request parameter.
    ///
    /// Accepts `all`, a source name (`portfolio`) or a domain name
    /// (`career_job`), case-insensitively. Anything else becomes
    /// [`DomainFilter::Unknown`].
    pub fn parse(raw: &str) -> Self {
        let name = raw.trim().to_lowercase();
        if name.is_empty() || name == "all" {
            return Self::All;
        }
        if let Some(source) = SourceKind::from_name(&name) {
            return Self::Source(source);
        }
        match Domain::from_name(&name) {
            Some(domain) => Self::Domain(domain),
            None => Self::Unknown(name),
        }
    }

    /// Whether results from `domain` may be returned.
    pub fn admits(&self, domain: Domain) -> bool {
        match self {
            Self::All => true,
            Self::Source(source) => domain.source() == *source,
            Self::Domain(only) => domain == *only,
            Self::Unknown(_) => false,
        }
    }

    /// Whether any domain of `source` may be returned.
    pub fn admits_source(&self, source: SourceKind) -> bool {
        source.domains().iter().any(|d| self.admits(*d))
    }
}

impl fmt::Display for DomainFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Source(source) => f.write_str(source.name()),
            Self::Domain(domain) => f.write_str(domain.name()),
            Self::Unknown(name) => f.write_str(name),
        }
    }
}

/// A single ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Entity id, unique within its domain.
    pub id: String,
    /// Domain the entity belongs to.
    pub domain: Domain,
    /// Display title (or name).
    pub title: String,
    /// Short description chosen per domain.
    pub description: String,
    /// Public site URL.
    pub url: String,
    /// Relevance score, higher is better. Never negative.
    pub score: f64,
    /// Domain-specific extras for the UI.
    pub metadata: Map<String, Value>,
    /// Names of the fields that matched the query.
    pub highlighted_fields: Vec<String>,
}

/// Summary of the returned result list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Number of returned results.
    pub total_results: usize,
    /// Returned results per domain.
    pub by_domain: BTreeMap<Domain, usize>,
    /// Rounded mean score of the returned results (0 when empty).
    pub avg_score: i64,
}

/// The normalised query as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEcho {
    /// Trimmed term in its original case.
    pub term: String,
    /// Filter as given (`all`, a source or a domain name).
    #[serde(rename = "type")]
    pub filter: String,
    /// Whether fuzzy matching was enabled.
    pub fuzzy: bool,
    /// Effective result limit.
    pub limit: usize,
}

/// Everything a completed search returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Results sorted by score, at most `limit` long.
    pub results: Vec<SearchResult>,
    /// Statistics computed from `results`.
    pub stats: SearchStats,
    /// The query that produced these results.
    pub query: QueryEcho,
    /// Sources that failed and contributed nothing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<SourceKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_names_round_trip() {
        for domain in Domain::all() {
            assert_eq!(Domain::from_name(domain.name()), Some(*domain));
        }
        assert_eq!(Domain::from_name("pages"), None);
    }

    #[test]
    fn domain_serde_matches_name() {
        let json = serde_json::to_string(&Domain::CareerJob).expect("serialize");
        assert_eq!(json, "\"career_job\"");
    }

    #[test]
    fn every_domain_belongs_to_exactly_one_source() {
        for domain in Domain::all() {
            let owners: Vec<_> = SourceKind::all()
                .iter()
                .filter(|s| s.domains().contains(domain))
                .collect();
            assert_eq!(owners.len(), 1, "{domain} owned by {owners:?}");
            assert_eq!(*owners[0], domain.source());
        }
    }

    #[test]
    fn source_order_is_pinned() {
        assert_eq!(
            SourceKind::all(),
            &[
                SourceKind::Pages,
                SourceKind::Portfolio,
                SourceKind::Careers,
                SourceKind::Newsletter
            ]
        );
    }

    #[test]
    fn filter_parse_variants() {
        assert_eq!(DomainFilter::parse("all"), DomainFilter::All);
        assert_eq!(DomainFilter::parse(""), DomainFilter::All);
        assert_eq!(
            DomainFilter::parse("Portfolio"),
            DomainFilter::Source(SourceKind::Portfolio)
        );
        assert_eq!(
            DomainFilter::parse("career_job"),
            DomainFilter::Domain(Domain::CareerJob)
        );
        assert_eq!(
            DomainFilter::parse("blog"),
            DomainFilter::Unknown("blog".into())
        );
    }

    #[test]
    fn filter_admits() {
        let portfolio = DomainFilter::Source(SourceKind::Portfolio);
        assert!(portfolio.admits(Domain::PortfolioProject));
        assert!(portfolio.admits(Domain::PortfolioCategory));
        assert!(!portfolio.admits(Domain::Page));

        let job = DomainFilter::Domain(Domain::CareerJob);
        assert!(job.admits(Domain::CareerJob));
        assert!(!job.admits(Domain::CareerDepartment));
        assert!(job.admits_source(SourceKind::Careers));
        assert!(!job.admits_source(SourceKind::Pages));

        let unknown = DomainFilter::Unknown("blog".into());
        assert!(Domain::all().iter().all(|d| !unknown.admits(*d)));
    }

    #[test]
    fn filter_display_echoes_name() {
        assert_eq!(DomainFilter::All.to_string(), "all");
        assert_eq!(
            DomainFilter::Source(SourceKind::Newsletter).to_string(),
            "newsletter"
        );
        assert_eq!(
            DomainFilter::Domain(Domain::NewsletterAuthor).to_string(),
            "newsletter_author"
        );
    }

    #[test]
    fn stats_serialize_camel_case_with_domain_keys() {
        let mut by_domain = BTreeMap::new();
        by_domain.insert(Domain::Page, 2);
        let stats = SearchStats {
            total_results: 2,
            by_domain,
            avg_score: 13,
        };
        let value = serde_json::to_value(&stats).expect("serialize");
        assert_eq!(value["totalResults"], 2);
        assert_eq!(value["byDomain"]["page"], 2);
        assert_eq!(value["avgScore"], 13);
    }

    #[test]
    fn outcome_omits_empty_degraded_list() {
        let outcome = SearchOutcome {
            results: vec![],
            stats: SearchStats::default(),
            query: QueryEcho {
                term: "Torre".into(),
                filter: "all".into(),
                fuzzy: false,
                limit: 50,
            },
            degraded: vec![],
        };
        let value = serde_json::to_value(&outcome).expect("serialize");
        assert!(value.get("degraded").is_none());
        assert_eq!(value["query"]["type"], "all");
    }
}
