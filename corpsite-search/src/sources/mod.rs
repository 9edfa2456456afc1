//! Content sources: one adapter per group of domains.
//!
//! Each adapter implements [`SourceAdapter`], reads its domains through an
//! injected [`ContentRepository`], scores every record against the domain's
//! fixed field table and emits a [`Candidate`] for every record scoring
//! above zero.

pub mod careers;
pub mod newsletter;
pub mod pages;
pub mod portfolio;

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::SourceError;
use crate::query::SearchQuery;
use crate::repository::ContentRepository;
use crate::scoring::{matching_fields, score_fields, SearchableField};
use crate::types::{Domain, SearchResult, SourceKind};

pub use careers::{CareerDepartment, CareerJob, CareersSource, JobLocation};
pub use newsletter::{NewsletterArticle, NewsletterAuthor, NewsletterCategory, NewsletterSource};
pub use pages::{Page, PagesSource};
pub use portfolio::{PortfolioCategory, PortfolioProject, PortfolioSource};

/// Repositories registered per source.
pub type SourceRegistry = HashMap<SourceKind, Arc<dyn ContentRepository>>;

/// A pluggable content source.
///
/// Implementors own a fixed set of domains and must only read the ones the
/// query's filter admits. All implementations must be `Send + Sync` so
/// sources can be queried concurrently.
pub trait SourceAdapter: Send + Sync {
    /// Fetch and score every admitted record of this source.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any repository call fails. The caller
    /// treats this as "no candidates from this source".
    fn fetch_candidates(
        &self,
        query: &SearchQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Candidate>, SourceError>> + Send;

    /// Which source this adapter represents.
    fn kind(&self) -> SourceKind;
}

/// A typed content record of one domain.
pub trait Record: DeserializeOwned + Send + Sync + Sized + 'static {
    /// The domain this record type belongs to.
    const DOMAIN: Domain;

    /// Weighted fields searched for this domain.
    const FIELDS: &'static [SearchableField<Self>];

    /// Public result shape, with a zero score and no highlights.
    fn to_result(&self) -> SearchResult;
}

/// A scored record that survived the zero-score cut.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Public result, score filled in.
    pub result: SearchResult,
    /// The record the result was built from.
    pub entity: Entity,
}

/// Any record the engine can return.
#[derive(Debug, Clone)]
pub enum Entity {
    /// Static page.
    Page(Page),
    /// Portfolio project.
    PortfolioProject(PortfolioProject),
    /// Portfolio category.
    PortfolioCategory(PortfolioCategory),
    /// Job posting.
    CareerJob(CareerJob),
    /// Careers department.
    CareerDepartment(CareerDepartment),
    /// Newsletter article.
    NewsletterArticle(NewsletterArticle),
    /// Newsletter author.
    NewsletterAuthor(NewsletterAuthor),
    /// Newsletter category.
    NewsletterCategory(NewsletterCategory),
}

macro_rules! entity_from {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl From<$variant> for Entity {
                fn from(record: $variant) -> Self {
                    Self::$variant(record)
                }
            }
        )+
    };
}

entity_from!(
    Page,
    PortfolioProject,
    PortfolioCategory,
    CareerJob,
    CareerDepartment,
    NewsletterArticle,
    NewsletterAuthor,
    NewsletterCategory,
);

impl Entity {
    /// The record's domain.
    pub fn domain(&self) -> Domain {
        match self {
            Self::Page(_) => Page::DOMAIN,
            Self::PortfolioProject(_) => PortfolioProject::DOMAIN,
            Self::PortfolioCategory(_) => PortfolioCategory::DOMAIN,
            Self::CareerJob(_) => CareerJob::DOMAIN,
            Self::CareerDepartment(_) => CareerDepartment::DOMAIN,
            Self::NewsletterArticle(_) => NewsletterArticle::DOMAIN,
            Self::NewsletterAuthor(_) => NewsletterAuthor::DOMAIN,
            Self::NewsletterCategory(_) => NewsletterCategory::DOMAIN,
        }
    }

    /// Names of the fields that match `query` on their own.
    pub fn highlighted_fields(&self, query: &SearchQuery) -> Vec<String> {
        match self {
            Self::Page(r) => matching_fields(r, Page::FIELDS, query),
            Self::PortfolioProject(r) => matching_fields(r, PortfolioProject::FIELDS, query),
            Self::PortfolioCategory(r) => matching_fields(r, PortfolioCategory::FIELDS, query),
            Self::CareerJob(r) => matching_fields(r, CareerJob::FIELDS, query),
            Self::CareerDepartment(r) => matching_fields(r, CareerDepartment::FIELDS, query),
            Self::NewsletterArticle(r) => matching_fields(r, NewsletterArticle::FIELDS, query),
            Self::NewsletterAuthor(r) => matching_fields(r, NewsletterAuthor::FIELDS, query),
            Self::NewsletterCategory(r) => matching_fields(r, NewsletterCategory::FIELDS, query),
        }
    }
}

/// Total score of a record against its domain's field table.
pub fn score_record<R: Record>(record: &R, query: &SearchQuery) -> f64 {
    score_fields(record, R::FIELDS, query)
}

/// Read one domain, decode and score its records.
///
/// Records that fail to decode are skipped; a failing repository call fails
/// the whole scan. Candidates keep repository order.
pub(crate) async fn scan<R>(
    repository: &dyn ContentRepository,
    query: &SearchQuery,
) -> Result<Vec<Candidate>, SourceError>
where
    R: Record,
    Entity: From<R>,
{
    let raw = repository.fetch_all(R::DOMAIN).await?;
    let total = raw.len();
    let mut candidates = Vec::new();

    for (index, value) in raw.into_iter().enumerate() {
        let record: R = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(domain = %R::DOMAIN, index, error = %err, "skipping malformed record");
                continue;
            }
        };
        let score = score_record(&record, query);
        if score > 0.0 {
            let mut result = record.to_result();
            result.score = score;
            candidates.push(Candidate {
                result,
                entity: record.into(),
            });
        }
    }

    tracing::trace!(domain = %R::DOMAIN, total, matched = candidates.len(), "domain scanned");
    Ok(candidates)
}

/// Scan `R`'s domain only if the query's filter admits it.
pub(crate) async fn scan_if_admitted<R>(
    repository: &dyn ContentRepository,
    query: &SearchQuery,
    candidates: &mut Vec<Candidate>,
) -> Result<(), SourceError>
where
    R: Record,
    Entity: From<R>,
{
    if query.filter().admits(R::DOMAIN) {
        candidates.extend(scan::<R>(repository, query).await?);
    }
    Ok(())
}

/// Public URL for a record: `{prefix}/{slug}`, falling back to the id.
pub(crate) fn record_url(prefix: &str, slug: &str, id: &str) -> String {
    let segment = if slug.trim().is_empty() { id } else { slug };
    format!("{prefix}/{segment}")
}

/// Build a metadata map from key/value pairs.
pub(crate) fn metadata<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

/// Accept string or numeric ids; `null` becomes an empty id.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("unsupported id value: {other}"))),
    }
}

/// Decode a text field. Strings pass through and numbers are rendered;
/// anything else (null, objects, lists, booleans) becomes empty text.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Decode a list of labels, keeping string and number items as text.
///
/// A bare string is a one-item list; any other non-list value is empty.
pub(crate) fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        Value::String(item) => vec![item],
        _ => Vec::new(),
    })
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
