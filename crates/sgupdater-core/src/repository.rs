//! Sources of stored account items.
//!
//! An [`AccountRepository`] performs a full, unordered read of one named
//! collection. A failed read is reported as a single [`FetchError`] for the
//! whole batch.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use sgupdater_model::Item;
use tracing::debug;

use crate::error::FetchError;

/// Full-scan access to stored account items.
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Name of the backing collection, used in diagnostics.
    fn name(&self) -> &str;

    /// Fetch every stored item.
    async fn fetch_all(&self) -> Result<Vec<Item>, FetchError>;
}

/// Fixed list of items held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountRepository {
    name: String,
    items: Vec<Item>,
}

impl InMemoryAccountRepository {
    /// Create a repository serving `items` under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_all(&self) -> Result<Vec<Item>, FetchError> {
        Ok(self.items.clone())
    }
}

/// Items read from a DynamoDB-JSON export file.
///
/// Accepts either a bare JSON array of items or the output of
/// `aws dynamodb scan --output json` (an object with an `Items` array).
#[derive(Debug, Clone)]
pub struct FileAccountRepository {
    path: PathBuf,
    name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExportDocument {
    Items(Vec<Item>),
    Scan {
        #[serde(rename = "Items")]
        items: Vec<Item>,
    },
}

impl FileAccountRepository {
    /// Create a repository reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    /// Path of the export file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AccountRepository for FileAccountRepository {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_all(&self) -> Result<Vec<Item>, FetchError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| FetchError::new(&self.name, e))?;
        let document: ExportDocument =
            serde_json::from_slice(&raw).map_err(|e| FetchError::new(&self.name, e))?;

        let items = match document {
            ExportDocument::Items(items) | ExportDocument::Scan { items } => items,
        };
        debug!(path = %self.path.display(), count = items.len(), "read account export file");
        Ok(items)
    }
}
