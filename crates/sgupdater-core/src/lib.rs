//! Account validation and loading for sgupdater.
//!
//! This crate turns stored account items into validated
//! [`AccountEntry`](sgupdater_model::AccountEntry) values:
//!
//! - [`validate`] checks required fields and fills in defaults,
//! - [`repository`] defines where stored items come from,
//! - [`loader`] runs a full load and reports rejected entries per item,
//! - [`config`] holds the runtime configuration resolved at startup.

pub mod config;
pub mod error;
pub mod loader;
pub mod repository;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use config::{LogFormat, UpdaterConfig};
pub use error::{ConfigError, EntryError, FetchError, RejectedEntriesError};
pub use loader::{
    AccountLoadReport, EntryRejection, InvalidEntryPolicy, load_accounts, validate_items,
};
pub use repository::{AccountRepository, FileAccountRepository, InMemoryAccountRepository};
pub use validate::{ValidationError, validate_account};
