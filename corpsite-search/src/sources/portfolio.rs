//! Portfolio projects and their categories.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{
    lenient_id, lenient_list, lenient_text, metadata, record_url, scan_if_admitted, Candidate,
    Record, SourceAdapter,
};
use crate::error::SourceError;
use crate::query::SearchQuery;
use crate::repository::ContentRepository;
use crate::scoring::{joined, text, SearchableField};
use crate::types::{Domain, SearchResult, SourceKind};

/// A completed or ongoing project shown in the portfolio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioProject {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(deserialize_with = "lenient_text")]
    pub client: String,
    #[serde(alias = "categoryId", deserialize_with = "lenient_text")]
    pub category_id: String,
    /// Kept verbatim; the admin console stores it as a number or a string.
    pub year: Value,
    pub featured: Value,
    #[serde(deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
}

impl Record for PortfolioProject {
    const DOMAIN: Domain = Domain::PortfolioProject;

    const FIELDS: &'static [SearchableField<Self>] = &[
        SearchableField {
            name: "title",
            boost: 3.0,
            extract: |p: &PortfolioProject| text(&p.title),
        },
        SearchableField {
            name: "description",
            boost: 2.0,
            extract: |p: &PortfolioProject| text(&p.description),
        },
        SearchableField {
            name: "location",
            boost: 1.0,
            extract: |p: &PortfolioProject| text(&p.location),
        },
        SearchableField {
            name: "client",
            boost: 1.0,
            extract: |p: &PortfolioProject| text(&p.client),
        },
        SearchableField {
            name: "tags",
            boost: 1.0,
            extract: |p: &PortfolioProject| joined(&p.tags),
        },
    ];

    fn to_result(&self) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            domain: Self::DOMAIN,
            title: self.title.clone(),
            description: self.description.clone(),
            url: record_url("/portfolio", &self.slug, &self.id),
            score: 0.0,
            metadata: metadata([
                ("location", json!(self.location)),
                ("client", json!(self.client)),
                ("categoryId", json!(self.category_id)),
                ("year", self.year.clone()),
                ("featured", self.featured.clone()),
                ("tags", json!(self.tags)),
            ]),
            highlighted_fields: Vec::new(),
        }
    }
}

/// A grouping of portfolio projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioCategory {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(alias = "projectsCount")]
    pub projects_count: Value,
}

impl Record for PortfolioCategory {
    const DOMAIN: Domain = Domain::PortfolioCategory;

    const FIELDS: &'static [SearchableField<Self>] = &[
        SearchableField {
            name: "name",
            boost: 3.0,
            extract: |c: &PortfolioCategory| text(&c.name),
        },
        SearchableField {
            name: "description",
            boost: 2.0,
            extract: |c: &PortfolioCategory| text(&c.description),
        },
    ];

    fn to_result(&self) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            domain: Self::DOMAIN,
            title: self.name.clone(),
            description: self.description.clone(),
            url: record_url("/portfolio/category", &self.slug, &self.id),
            score: 0.0,
            metadata: metadata([("projectsCount", self.projects_count.clone())]),
            highlighted_fields: Vec::new(),
        }
    }
}

/// Source for portfolio projects and categories.
pub struct PortfolioSource {
    repository: Arc<dyn ContentRepository>,
}

impl PortfolioSource {
    /// Create a source reading from `repository`.
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self { repository }
    }
}

impl SourceAdapter for PortfolioSource {
    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SourceError> {
        let repository = self.repository.as_ref();
        let mut candidates = Vec::new();
        scan_if_admitted::<PortfolioProject>(repository, query, &mut candidates).await?;
        scan_if_admitted::<PortfolioCategory>(repository, query, &mut candidates).await?;
        Ok(candidates)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Portfolio
    }
}
