//! Error types for loading account entries.

use sgupdater_model::DecodeError;

use crate::loader::EntryRejection;
use crate::validate::ValidationError;

/// Boxed error from a repository backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The backing store could not be read. Fatal for the whole batch.
#[derive(Debug, thiserror::Error)]
#[error("failed to fetch account entries from {collection}")]
pub struct FetchError {
    collection: String,
    #[source]
    source: BoxError,
}

impl FetchError {
    /// Create a fetch error for the named collection.
    pub fn new(collection: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            collection: collection.into(),
            source: source.into(),
        }
    }

    /// Name of the collection that could not be read.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

/// Why a single entry was rejected. Never affects sibling entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    /// The stored record does not match the account schema.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A required field is missing or empty.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl EntryError {
    /// Name of the attribute or field that caused the rejection.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Decode(e) => e.attribute(),
            Self::Validation(e) => e.field(),
        }
    }
}

/// Returned when the caller asked to fail on any rejected entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} account entries were rejected", rejected.len())]
pub struct RejectedEntriesError {
    /// Every rejection from the batch.
    pub rejected: Vec<EntryRejection>,
}

/// Invalid configuration input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Unknown log output format.
    #[error("invalid log format: {0} (expected `text` or `json`)")]
    InvalidLogFormat(String),
}
