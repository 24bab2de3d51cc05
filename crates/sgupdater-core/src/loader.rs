//! Batch loading of account entries.
//!
//! A load is one `fetch_all` followed by an independent decode and
//! validation of every item. Only a failed fetch aborts the load; a bad item
//! becomes an [`EntryRejection`] next to the accepted entries.

use serde::{Deserialize, Serialize};
use sgupdater_model::account::attr;
use sgupdater_model::{AccountEntry, Item, decode_candidate};
use tracing::{debug, error, info, info_span};

use crate::error::{EntryError, FetchError, RejectedEntriesError};
use crate::repository::AccountRepository;
use crate::validate::validate_account;

/// What to do with a batch that contains rejected entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvalidEntryPolicy {
    /// Keep the valid entries and drop the rejected ones.
    #[default]
    Skip,
    /// Treat any rejection as a failure of the whole batch.
    Fail,
}

/// One stored item that did not produce an account entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRejection {
    /// Position of the item in the fetched batch.
    pub index: usize,
    /// `EntryID` of the item, if it holds a string.
    pub entry_id: Option<String>,
    /// `AccountID` of the item, if it holds a string.
    pub account_id: Option<String>,
    /// Reason for the rejection.
    pub error: EntryError,
}

/// Result of loading one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountLoadReport {
    /// Validated entries, in fetch order.
    pub accounts: Vec<AccountEntry>,
    /// Items that failed to decode or validate.
    pub rejected: Vec<EntryRejection>,
}

impl AccountLoadReport {
    /// Whether every fetched item produced an entry.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Drop the rejections and keep the valid entries.
    #[must_use]
    pub fn into_accounts(self) -> Vec<AccountEntry> {
        self.accounts
    }

    /// Resolve the report according to the caller's policy.
    pub fn apply_policy(
        self,
        policy: InvalidEntryPolicy,
    ) -> Result<Vec<AccountEntry>, RejectedEntriesError> {
        match policy {
            InvalidEntryPolicy::Fail if !self.rejected.is_empty() => Err(RejectedEntriesError {
                rejected: self.rejected,
            }),
            InvalidEntryPolicy::Skip | InvalidEntryPolicy::Fail => Ok(self.accounts),
        }
    }
}

/// Fetch every item from `repo`, then decode and validate each one.
#[tracing::instrument(skip_all, fields(collection = repo.name()))]
pub async fn load_accounts(repo: &dyn AccountRepository) -> Result<AccountLoadReport, FetchError> {
    let items = repo.fetch_all().await.inspect_err(|e| {
        error!(
            error = e as &(dyn std::error::Error + 'static),
            "failed to get accounts"
        );
    })?;

    let report = validate_items(&items);
    debug!(accounts = ?report.accounts, "account configurations retrieved");
    info!(
        loaded = report.accounts.len(),
        rejected = report.rejected.len(),
        "account entries loaded"
    );
    Ok(report)
}

/// Decode and validate a fetched batch. Each item is handled on its own.
#[must_use]
pub fn validate_items(items: &[Item]) -> AccountLoadReport {
    let mut report = AccountLoadReport::default();

    for (index, item) in items.iter().enumerate() {
        let _span = info_span!("entry", index).entered();

        let result = decode_candidate(item)
            .map_err(EntryError::from)
            .and_then(|candidate| validate_account(candidate).map_err(EntryError::from));

        match result {
            Ok(entry) => report.accounts.push(entry),
            Err(err) => {
                let rejection = EntryRejection {
                    index,
                    entry_id: string_attr(item, attr::ENTRY_ID),
                    account_id: string_attr(item, attr::ACCOUNT_ID),
                    error: err,
                };
                // validate_account logs its own rejections
                if let EntryError::Decode(decode) = &rejection.error {
                    error!(
                        entry_id = rejection.entry_id.as_deref(),
                        account_id = rejection.account_id.as_deref(),
                        field = decode.attribute(),
                        error = %decode,
                        "failed to decode account entry"
                    );
                }
                report.rejected.push(rejection);
            }
        }
    }

    report
}

fn string_attr(item: &Item, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s()).map(ToOwned::to_owned)
}
