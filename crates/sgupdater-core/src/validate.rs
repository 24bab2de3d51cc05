//! Account entry validation and defaulting.
//!
//! [`validate_account`] turns one [`AccountCandidate`] into an
//! [`AccountEntry`]. Required fields are checked in a fixed order (AccountID,
//! then Regions) and the first missing one rejects the entry. Every other
//! field falls back to its default when unset, independently of the others.
//!
//! An empty string, an empty collection, or a non-positive
//! `DurationSeconds` counts as unset.

use std::collections::BTreeSet;

use sgupdater_model::account::{
    DEFAULT_ALLOW_PORTS, DEFAULT_DESCRIPTION, DEFAULT_DURATION_SECONDS,
    DEFAULT_EXCLUSIVE_TAG_VALUE, DEFAULT_MANAGED_TAG_VALUE, DEFAULT_ROLE_NAME,
    DEFAULT_SESSION_NAME, DEFAULT_TAG_NAME, attr,
};
use sgupdater_model::{AccountCandidate, AccountEntry};
use tracing::error;

/// A required field is missing or empty. Permanent; never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `AccountID` is absent or empty.
    #[error("Account ID cannot be empty")]
    MissingAccountId,

    /// `Regions` is absent or empty.
    #[error("You must specify at least 1 region for an account")]
    MissingRegions,
}

impl ValidationError {
    /// Stored attribute name of the missing field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingAccountId => attr::ACCOUNT_ID,
            Self::MissingRegions => attr::REGIONS,
        }
    }
}

/// Validate one candidate and fill in defaults.
///
/// Pure apart from an error event on rejection; safe to call concurrently
/// on independent candidates.
///
/// # Examples
///
/// ```
/// use sgupdater_core::validate_account;
/// use sgupdater_model::AccountCandidate;
///
/// let entry = validate_account(
///     AccountCandidate::builder()
///         .account_id("123")
///         .regions(vec!["us-east-1".to_owned()])
///         .build(),
/// )
/// .unwrap();
/// assert_eq!(entry.duration_seconds, 1800);
/// ```
pub fn validate_account(candidate: AccountCandidate) -> Result<AccountEntry, ValidationError> {
    if candidate.account_id.as_deref().is_none_or(str::is_empty) {
        return Err(reject(&candidate, ValidationError::MissingAccountId));
    }
    if candidate.regions.as_ref().is_none_or(Vec::is_empty) {
        return Err(reject(&candidate, ValidationError::MissingRegions));
    }

    let AccountCandidate {
        entry_id,
        account_id,
        allow_ports,
        regions,
        role_name,
        session_name,
        duration_seconds,
        external_id,
        tag_name,
        exclusive_tag_values,
        managed_tag_values,
        description,
    } = candidate;

    Ok(AccountEntry {
        entry_id,
        account_id: account_id.unwrap_or_default(),
        allow_ports: non_empty_set(allow_ports)
            .unwrap_or_else(|| BTreeSet::from(DEFAULT_ALLOW_PORTS)),
        regions: regions.unwrap_or_default(),
        role_name: non_empty(role_name).unwrap_or_else(|| DEFAULT_ROLE_NAME.to_owned()),
        session_name: non_empty(session_name)
            .unwrap_or_else(|| DEFAULT_SESSION_NAME.to_owned()),
        duration_seconds: duration_seconds
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_DURATION_SECONDS),
        external_id,
        tag_name: non_empty(tag_name).unwrap_or_else(|| DEFAULT_TAG_NAME.to_owned()),
        exclusive_tag_values: non_empty_set(exclusive_tag_values)
            .unwrap_or_else(|| BTreeSet::from([DEFAULT_EXCLUSIVE_TAG_VALUE.to_owned()])),
        managed_tag_values: non_empty_set(managed_tag_values)
            .unwrap_or_else(|| BTreeSet::from([DEFAULT_MANAGED_TAG_VALUE.to_owned()])),
        description: non_empty(description).unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
    })
}

fn reject(candidate: &AccountCandidate, err: ValidationError) -> ValidationError {
    error!(
        entry_id = candidate.entry_id.as_deref(),
        account_id = candidate.account_id.as_deref(),
        field = err.field(),
        "{err}"
    );
    err
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn non_empty_set<T: Ord>(value: Option<BTreeSet<T>>) -> Option<BTreeSet<T>> {
    value.filter(|s| !s.is_empty())
}
