//! Content repository collaborator.
//!
//! The engine never reads storage itself. Each source calls
//! [`ContentRepository::fetch_all`] once per domain it needs and decodes the
//! returned JSON values into typed records.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::Domain;

/// Error reported by a content repository.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("repository error: {message}")]
pub struct RepositoryError {
    message: String,
}

impl RepositoryError {
    /// Create an error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message without the `repository error:` prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Read access to the stored entities of each content domain.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Return every stored entity of `domain` as raw JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backing store cannot be read.
    async fn fetch_all(&self, domain: Domain) -> Result<Vec<Value>, RepositoryError>;
}

/// Repository holding its collections in memory.
///
/// Domains without a collection read as empty.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    collections: HashMap<Domain, Vec<Value>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection for `domain`.
    pub fn with(mut self, domain: Domain, entities: Vec<Value>) -> Self {
        self.collections.insert(domain, entities);
        self
    }

    /// Append one entity to the collection for `domain`.
    pub fn insert(&mut self, domain: Domain, entity: Value) {
        self.collections.entry(domain).or_default().push(entity);
    }
}

#[async_trait]
impl ContentRepository for MemoryRepository {
    async fn fetch_all(&self, domain: Domain) -> Result<Vec<Value>, RepositoryError> {
        Ok(self.collections.get(&domain).cloned().unwrap_or_default())
    }
}
