//! Static site pages.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map};

use super::{
    lenient_id, lenient_text, metadata, record_url, scan_if_admitted, Candidate, Record,
    SourceAdapter,
};
use crate::error::SourceError;
use crate::query::SearchQuery;
use crate::repository::ContentRepository;
use crate::scoring::{text, SearchableField};
use crate::types::{Domain, SearchResult, SourceKind};

/// A static page managed from the admin console.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(alias = "metaDescription", deserialize_with = "lenient_text")]
    pub meta_description: String,
}

impl Record for Page {
    const DOMAIN: Domain = Domain::Page;

    const FIELDS: &'static [SearchableField<Self>] = &[
        SearchableField {
            name: "title",
            boost: 3.0,
            extract: |p: &Page| text(&p.title),
        },
        SearchableField {
            name: "description",
            boost: 2.0,
            extract: |p: &Page| text(&p.description),
        },
        SearchableField {
            name: "metaDescription",
            boost: 1.0,
            extract: |p: &Page| text(&p.meta_description),
        },
    ];

    fn to_result(&self) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            domain: Self::DOMAIN,
            title: self.title.clone(),
            description: self.description.clone(),
            url: record_url("", &self.slug, &self.id),
            score: 0.0,
            metadata: if self.meta_description.is_empty() {
                Map::new()
            } else {
                metadata([("metaDescription", json!(self.meta_description))])
            },
            highlighted_fields: Vec::new(),
        }
    }
}

/// Source for static pages.
pub struct PagesSource {
    repository: Arc<dyn ContentRepository>,
}

impl PagesSource {
    /// Create a source reading from `repository`.
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self { repository }
    }
}

impl SourceAdapter for PagesSource {
    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SourceError> {
        let mut candidates = Vec::new();
        scan_if_admitted::<Page>(self.repository.as_ref(), query, &mut candidates).await?;
        Ok(candidates)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::query::RawQuery;
    use crate::repository::MemoryRepository;
    use crate::sources::score_record;

    fn query(term: &str) -> SearchQuery {
        SearchQuery::parse(RawQuery::new(term), &SearchConfig::default()).expect("valid")
    }

    fn services_page() -> Page {
        Page {
            id: "p1".into(),
            title: "Nuestros Servicios".into(),
            slug: "servicios".into(),
            description: "servicios de construcción".into(),
            meta_description: String::new(),
        }
    }

    #[test]
    fn description_exact_match_weighted_by_two() {
        // description: (10 + 3) * 2; title and meta description do not match.
        let score = score_record(&services_page(), &query("construcción"));
        assert!((score - 26.0).abs() < f64::EPSILON);
    }

    #[test]
    fn title_outranks_meta_description() {
        let in_title = Page {
            title: "Ingeniería".into(),
            ..Default::default()
        };
        let in_meta = Page {
            meta_description: "Ingeniería".into(),
            ..Default::default()
        };
        let q = query("ingeniería");
        assert!(score_record(&in_title, &q) > score_record(&in_meta, &q));
    }

    #[test]
    fn result_mapping() {
        let result = services_page().to_result();
        assert_eq!(result.domain, Domain::Page);
        assert_eq!(result.url, "/servicios");
        assert_eq!(result.description, "servicios de construcción");
        assert!(result.metadata.is_empty());
    }

    #[test]
    fn camel_case_meta_description_accepted() {
        let page: Page = serde_json::from_value(serde_json::json!({
            "id": "x",
            "title": "Inicio",
            "metaDescription": "Empresa constructora",
            "description": null
        }))
        .expect("decode");
        assert_eq!(page.meta_description, "Empresa constructora");
        assert_eq!(page.description, "");
    }

    #[tokio::test]
    async fn skipped_when_filter_excludes_pages() {
        let repo = MemoryRepository::new().with(
            Domain::Page,
            vec![serde_json::to_value(services_page()).expect("encode")],
        );
        let source = PagesSource::new(Arc::new(repo));
        let q = SearchQuery::parse(
            RawQuery::new("servicios").with_filter("portfolio"),
            &SearchConfig::default(),
        )
        .expect("valid");
        assert!(source.fetch_candidates(&q).await.expect("fetch").is_empty());

        let found = source.fetch_candidates(&query("servicios")).await.expect("fetch");
        assert_eq!(found.len(), 1);
        assert_eq!(source.kind(), SourceKind::Pages);
    }
}
