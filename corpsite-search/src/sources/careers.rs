//! Job postings and departments.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
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

/// Where a job is based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobLocation {
    #[serde(deserialize_with = "lenient_text")]
    pub city: String,
    #[serde(deserialize_with = "lenient_text")]
    pub region: String,
    #[serde(deserialize_with = "lenient_text")]
    pub country: String,
}

impl JobLocation {
    /// `"city, region, country"` without the empty parts.
    pub fn display(&self) -> String {
        [&self.city, &self.region, &self.country]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Decode a job location: an object with city/region/country, or a bare
/// string naming the city. Anything else is an unknown location.
fn job_location<'de, D>(deserializer: D) -> Result<JobLocation, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        object @ Value::Object(_) => serde_json::from_value(object).unwrap_or_default(),
        Value::String(city) => JobLocation {
            city,
            ..JobLocation::default()
        },
        _ => JobLocation::default(),
    })
}

/// An open position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerJob {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(alias = "shortDescription", deserialize_with = "lenient_text")]
    pub short_description: String,
    #[serde(alias = "fullDescription", deserialize_with = "lenient_text")]
    pub full_description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub department: String,
    #[serde(deserialize_with = "job_location")]
    pub location: JobLocation,
    #[serde(alias = "employmentType", deserialize_with = "lenient_text")]
    pub employment_type: String,
    #[serde(alias = "requiredSkills", deserialize_with = "lenient_list")]
    pub required_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: String,
}

impl Record for CareerJob {
    const DOMAIN: Domain = Domain::CareerJob;

    const FIELDS: &'static [SearchableField<Self>] = &[
        SearchableField {
            name: "title",
            boost: 3.0,
            extract: |j: &CareerJob| text(&j.title),
        },
        SearchableField {
            name: "shortDescription",
            boost: 2.0,
            extract: |j: &CareerJob| text(&j.short_description),
        },
        SearchableField {
            name: "fullDescription",
            boost: 1.0,
            extract: |j: &CareerJob| text(&j.full_description),
        },
        SearchableField {
            name: "department",
            boost: 2.0,
            extract: |j: &CareerJob| text(&j.department),
        },
        SearchableField {
            name: "location.city",
            boost: 1.0,
            extract: |j: &CareerJob| text(&j.location.city),
        },
        SearchableField {
            name: "requiredSkills",
            boost: 1.0,
            extract: |j: &CareerJob| joined(&j.required_skills),
        },
        SearchableField {
            name: "tags",
            boost: 1.0,
            extract: |j: &CareerJob| joined(&j.tags),
        },
    ];

    fn to_result(&self) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            domain: Self::DOMAIN,
            title: self.title.clone(),
            description: self.short_description.clone(),
            url: record_url("/careers", &self.slug, &self.id),
            score: 0.0,
            metadata: metadata([
                ("department", json!(self.department)),
                ("location", json!(self.location.display())),
                ("employmentType", json!(self.employment_type)),
                ("status", json!(self.status)),
            ]),
            highlighted_fields: Vec::new(),
        }
    }
}

/// A department that groups job postings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerDepartment {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(alias = "detailedDescription", deserialize_with = "lenient_text")]
    pub detailed_description: String,
    #[serde(alias = "openPositions")]
    pub open_positions: Value,
}

impl Record for CareerDepartment {
    const DOMAIN: Domain = Domain::CareerDepartment;

    const FIELDS: &'static [SearchableField<Self>] = &[
        SearchableField {
            name: "name",
            boost: 3.0,
            extract: |d: &CareerDepartment| text(&d.name),
        },
        SearchableField {
            name: "description",
            boost: 2.0,
            extract: |d: &CareerDepartment| text(&d.description),
        },
        SearchableField {
            name: "detailedDescription",
            boost: 1.0,
            extract: |d: &CareerDepartment| text(&d.detailed_description),
        },
    ];

    fn to_result(&self) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            domain: Self::DOMAIN,
            title: self.name.clone(),
            description: self.description.clone(),
            url: record_url("/careers/department", &self.slug, &self.id),
            score: 0.0,
            metadata: metadata([("openPositions", self.open_positions.clone())]),
            highlighted_fields: Vec::new(),
        }
    }
}

/// Source for job postings and departments.
pub struct CareersSource {
    repository: Arc<dyn ContentRepository>,
}

impl CareersSource {
    /// Create a source reading from `repository`.
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self { repository }
    }
}

impl SourceAdapter for CareersSource {
    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SourceError> {
        let repository = self.repository.as_ref();
        let mut candidates = Vec::new();
        scan_if_admitted::<CareerJob>(repository, query, &mut candidates).await?;
        scan_if_admitted::<CareerDepartment>(repository, query, &mut candidates).await?;
        Ok(candidates)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Careers
    }
}
