//! File-backed content repository.
//!
//! Each content domain lives in its own JSON file under the data
//! directory. A file holds either a bare array of records or an object
//! with an `items` array, which is how the admin console exports them.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use corpsite_search::{ContentRepository, Domain, RepositoryError};
use serde_json::Value;

/// File name of the collection backing `domain`.
pub fn collection_file(domain: Domain) -> &'static str {
    match domain {
        Domain::Page => "pages.json",
        Domain::PortfolioProject => "portfolio_projects.json",
        Domain::PortfolioCategory => "portfolio_categories.json",
        Domain::CareerJob => "career_jobs.json",
        Domain::CareerDepartment => "career_departments.json",
        Domain::NewsletterArticle => "newsletter_articles.json",
        Domain::NewsletterAuthor => "newsletter_authors.json",
        Domain::NewsletterCategory => "newsletter_categories.json",
    }
}

/// Reads content collections from JSON files on every call.
///
/// A missing file is an empty collection. Unreadable files and invalid
/// JSON are repository errors, which the engine reports as a degraded
/// source.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    data_dir: PathBuf,
}

impl JsonFileRepository {
    /// Create a repository rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The directory collections are read from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the collection file for `domain`.
    pub fn collection_path(&self, domain: Domain) -> PathBuf {
        self.data_dir.join(collection_file(domain))
    }
}

#[async_trait]
impl ContentRepository for JsonFileRepository {
    async fn fetch_all(&self, domain: Domain) -> Result<Vec<Value>, RepositoryError> {
        let path = self.collection_path(domain);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(%domain, path = %path.display(), "collection file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(RepositoryError::new(format!(
                    "failed to read {}: {err}",
                    path.display()
                )));
            }
        };

        let document: Value = serde_json::from_slice(&bytes).map_err(|err| {
            RepositoryError::new(format!("invalid JSON in {}: {err}", path.display()))
        })?;

        match document {
            Value::Array(items) => Ok(items),
            Value::Object(mut object) => match object.remove("items") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(RepositoryError::new(format!(
                    "{} must hold an array or an object with an `items` array",
                    path.display()
                ))),
            },
            _ => Err(RepositoryError::new(format!(
                "{} must hold an array or an object with an `items` array",
                path.display()
            ))),
        }
    }
}
