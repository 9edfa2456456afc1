//! Newsletter articles, authors and categories.

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

/// A published newsletter article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterArticle {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_text")]
    pub excerpt: String,
    #[serde(deserialize_with = "lenient_text")]
    pub content: String,
    #[serde(alias = "authorId", deserialize_with = "lenient_text")]
    pub author_id: String,
    #[serde(alias = "categoryId", deserialize_with = "lenient_text")]
    pub category_id: String,
    /// Kept verbatim: an ISO date string or a store timestamp object.
    #[serde(alias = "publishedAt")]
    pub published_at: Value,
    #[serde(deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
}

impl Record for NewsletterArticle {
    const DOMAIN: Domain = Domain::NewsletterArticle;

    const FIELDS: &'static [SearchableField<Self>] = &[
        SearchableField {
            name: "title",
            boost: 3.0,
            extract: |a: &NewsletterArticle| text(&a.title),
        },
        SearchableField {
            name: "excerpt",
            boost: 2.0,
            extract: |a: &NewsletterArticle| text(&a.excerpt),
        },
        SearchableField {
            name: "content",
            boost: 1.0,
            extract: |a: &NewsletterArticle| text(&a.content),
        },
        SearchableField {
            name: "tags",
            boost: 1.0,
            extract: |a: &NewsletterArticle| joined(&a.tags),
        },
    ];

    fn to_result(&self) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            domain: Self::DOMAIN,
            title: self.title.clone(),
            description: self.excerpt.clone(),
            url: record_url("/newsletter", &self.slug, &self.id),
            score: 0.0,
            metadata: metadata([
                ("authorId", json!(self.author_id)),
                ("categoryId", json!(self.category_id)),
                ("publishedAt", self.published_at.clone()),
                ("tags", json!(self.tags)),
            ]),
            highlighted_fields: Vec::new(),
        }
    }
}

/// A newsletter contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterAuthor {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_text")]
    pub bio: String,
    #[serde(deserialize_with = "lenient_text")]
    pub role: String,
    #[serde(deserialize_with = "lenient_list")]
    pub specializations: Vec<String>,
}

impl Record for NewsletterAuthor {
    const DOMAIN: Domain = Domain::NewsletterAuthor;

    const FIELDS: &'static [SearchableField<Self>] = &[
        SearchableField {
            name: "name",
            boost: 3.0,
            extract: |a: &NewsletterAuthor| text(&a.name),
        },
        SearchableField {
            name: "bio",
            boost: 1.0,
            extract: |a: &NewsletterAuthor| text(&a.bio),
        },
        SearchableField {
            name: "role",
            boost: 1.0,
            extract: |a: &NewsletterAuthor| text(&a.role),
        },
        SearchableField {
            name: "specializations",
            boost: 1.0,
            extract: |a: &NewsletterAuthor| joined(&a.specializations),
        },
    ];

    fn to_result(&self) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            domain: Self::DOMAIN,
            title: self.name.clone(),
            description: self.bio.clone(),
            url: record_url("/newsletter/author", &self.slug, &self.id),
            score: 0.0,
            metadata: metadata([
                ("role", json!(self.role)),
                ("specializations", json!(self.specializations)),
            ]),
            highlighted_fields: Vec::new(),
        }
    }
}

/// A newsletter topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterCategory {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(alias = "articleCount")]
    pub article_count: Value,
}

impl Record for NewsletterCategory {
    const DOMAIN: Domain = Domain::NewsletterCategory;

    const FIELDS: &'static [SearchableField<Self>] = &[
        SearchableField {
            name: "name",
            boost: 3.0,
            extract: |c: &NewsletterCategory| text(&c.name),
        },
        SearchableField {
            name: "description",
            boost: 2.0,
            extract: |c: &NewsletterCategory| text(&c.description),
        },
    ];

    fn to_result(&self) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            domain: Self::DOMAIN,
            title: self.name.clone(),
            description: self.description.clone(),
            url: record_url("/newsletter/category", &self.slug, &self.id),
            score: 0.0,
            metadata: metadata([("articleCount", self.article_count.clone())]),
            highlighted_fields: Vec::new(),
        }
    }
}

/// Source for newsletter articles, authors and categories.
pub struct NewsletterSource {
    repository: Arc<dyn ContentRepository>,
}

impl NewsletterSource {
    /// Create a source reading from `repository`.
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self { repository }
    }
}

impl SourceAdapter for NewsletterSource {
    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SourceError> {
        let repository = self.repository.as_ref();
        let mut candidates = Vec::new();
        scan_if_admitted::<NewsletterArticle>(repository, query, &mut candidates).await?;
        scan_if_admitted::<NewsletterAuthor>(repository, query, &mut candidates).await?;
        scan_if_admitted::<NewsletterCategory>(repository, query, &mut candidates).await?;
        Ok(candidates)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Newsletter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::query::RawQuery;
    use crate::repository::{ContentRepository, MemoryRepository, RepositoryError};
    use crate::sources::score_record;
    use async_trait::async_trait;
    use serde_json::Value;

    fn query(term: &str) -> SearchQuery {
        SearchQuery::parse(RawQuery::new(term), &SearchConfig::default()).expect("valid")
    }

    #[test]
    fn excerpt_outweighs_content() {
        let q = query("sostenibilidad");
        let in_excerpt = NewsletterArticle {
            excerpt: "Sostenibilidad en obra".into(),
            ..Default::default()
        };
        let in_content = NewsletterArticle {
            content: "Sostenibilidad en obra".into(),
            ..Default::default()
        };
        assert!(score_record(&in_excerpt, &q) > score_record(&in_content, &q));
    }

    #[test]
    fn author_specializations_searchable() {
        let author = NewsletterAuthor {
            id: "a1".into(),
            name: "María Quispe".into(),
            slug: "maria-quispe".into(),
            bio: "Arquitecta".into(),
            role: "Editora".into(),
            specializations: vec!["urbanismo".into(), "BIM".into()],
        };
        // specializations "urbanismo BIM": exact (10) + overlap (3).
        assert!((score_record(&author, &query("bim")) - 13.0).abs() < f64::EPSILON);
        let result = author.to_result();
        assert_eq!(result.title, "María Quispe");
        assert_eq!(result.description, "Arquitecta");
        assert_eq!(result.url, "/newsletter/author/maria-quispe");
        assert_eq!(result.metadata["role"], "Editora");
    }

    #[test]
    fn article_result_uses_excerpt() {
        let article: NewsletterArticle = serde_json::from_value(json!({
            "id": 5,
            "title": "Nuevas normas",
            "slug": "nuevas-normas",
            "excerpt": "Resumen",
            "authorId": "a1",
            "publishedAt": "2024-03-01"
        }))
        .expect("decode");
        let result = article.to_result();
        assert_eq!(result.description, "Resumen");
        assert_eq!(result.metadata["authorId"], "a1");
        assert_eq!(result.metadata["publishedAt"], "2024-03-01");
    }

    struct FailingAuthors {
        inner: MemoryRepository,
    }

    #[async_trait]
    impl ContentRepository for FailingAuthors {
        async fn fetch_all(&self, domain: Domain) -> Result<Vec<Value>, RepositoryError> {
            if domain == Domain::NewsletterAuthor {
                return Err(RepositoryError::new("authors collection unavailable"));
            }
            self.inner.fetch_all(domain).await
        }
    }

    #[tokio::test]
    async fn any_failing_domain_fails_the_source() {
        let inner = MemoryRepository::new().with(
            Domain::NewsletterArticle,
            vec![json!({"id": "1", "title": "Obras viales"})],
        );
        let source = NewsletterSource::new(Arc::new(FailingAuthors { inner }));
        let err = source
            .fetch_candidates(&query("obras"))
            .await
            .expect_err("authors fail");
        assert!(err.to_string().contains("authors collection unavailable"));

        // Restricted to articles, the failing collection is never read.
        let q = SearchQuery::parse(
            RawQuery::new("obras").with_filter("newsletter_article"),
            &SearchConfig::default(),
        )
        .expect("valid");
        assert_eq!(source.fetch_candidates(&q).await.expect("fetch").len(), 1);
    }
}
