//! Command-line flags and their resolution into [`UpdaterConfig`].
//!
//! Each setting is taken from the first source that provides it: an explicit
//! flag, then the environment variable, then the built-in default.

use std::convert::Infallible;
use std::path::PathBuf;

use clap::Parser;
use sgupdater_core::config::parse_bool;
use sgupdater_core::{ConfigError, InvalidEntryPolicy, LogFormat, UpdaterConfig};

/// Environment variable names, in the order they are documented.
pub mod env {
    /// Accounts table name.
    pub const ACCOUNTS_TABLE: &str = "ACCOUNTS_TABLE";
    /// Region of the accounts table.
    pub const AWS_REGION: &str = "AWS_REGION";
    /// DynamoDB endpoint override.
    pub const DYNAMODB_ENDPOINT_URL: &str = "DYNAMODB_ENDPOINT_URL";
    /// DynamoDB-JSON export to read instead of the table.
    pub const ACCOUNTS_FILE: &str = "ACCOUNTS_FILE";
    /// Debug logging switch.
    pub const DEBUG: &str = "DEBUG";
    /// Log output format.
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Fail when any entry is rejected.
    pub const FAIL_ON_INVALID: &str = "FAIL_ON_INVALID";
}

/// Load and validate the account entries used by the security-group updater.
#[derive(Debug, Parser)]
#[command(name = "sgupdater", version)]
pub struct Cli {
    /// DynamoDB table holding the account entries [env: ACCOUNTS_TABLE]
    #[arg(long = "table")]
    pub table_name: Option<String>,

    /// Region of the accounts table [env: AWS_REGION]
    #[arg(long)]
    pub region: Option<String>,

    /// DynamoDB endpoint override, e.g. a local emulator [env: DYNAMODB_ENDPOINT_URL]
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Read entries from a DynamoDB-JSON export instead of the table [env: ACCOUNTS_FILE]
    #[arg(long)]
    pub accounts_file: Option<PathBuf>,

    /// Enable debug logging [env: DEBUG]
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = parse_flag)]
    pub debug: Option<bool>,

    /// Log output format: text or json [env: LOG_FORMAT]
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Exit with an error when any entry is rejected [env: FAIL_ON_INVALID]
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = parse_flag)]
    pub fail_on_invalid: Option<bool>,
}

#[allow(clippy::unnecessary_wraps)]
fn parse_flag(value: &str) -> Result<bool, Infallible> {
    Ok(parse_bool(value))
}

impl Cli {
    /// Resolve against the process environment.
    pub fn resolve(self) -> Result<UpdaterConfig, ConfigError> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<UpdaterConfig, ConfigError> {
        let defaults = UpdaterConfig::default();

        let log_format = match self.log_format {
            Some(format) => format,
            None => lookup(env::LOG_FORMAT)
                .map(|v| v.parse::<LogFormat>())
                .transpose()?
                .unwrap_or(defaults.log_format),
        };
        let fail_on_invalid = self
            .fail_on_invalid
            .or_else(|| lookup(env::FAIL_ON_INVALID).map(|v| parse_bool(&v)))
            .unwrap_or(false);

        Ok(UpdaterConfig {
            table_name: self
                .table_name
                .or_else(|| lookup(env::ACCOUNTS_TABLE))
                .unwrap_or(defaults.table_name),
            region: self.region.or_else(|| lookup(env::AWS_REGION)),
            endpoint_url: self
                .endpoint_url
                .or_else(|| lookup(env::DYNAMODB_ENDPOINT_URL)),
            accounts_file: self
                .accounts_file
                .or_else(|| lookup(env::ACCOUNTS_FILE).map(PathBuf::from)),
            debug: self
                .debug
                .or_else(|| lookup(env::DEBUG).map(|v| parse_bool(&v)))
                .unwrap_or(defaults.debug),
            log_format,
            invalid_entry_policy: if fail_on_invalid {
                InvalidEntryPolicy::Fail
            } else {
                InvalidEntryPolicy::Skip
            },
        })
    }
}
