//! Runtime configuration for the account loader.
//!
//! The entrypoint resolves command-line flags, environment variables and the
//! defaults below once at startup; the resulting [`UpdaterConfig`] is never
//! re-read.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::ConfigError;
use crate::loader::InvalidEntryPolicy;

/// Table scanned when none is configured.
pub const DEFAULT_TABLE_NAME: &str = "UpdateSonarCloudSecurityGroupsAccounts";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_owned())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Account loader configuration.
///
/// # Examples
///
/// ```
/// use sgupdater_core::config::{LogFormat, UpdaterConfig};
///
/// let config = UpdaterConfig::builder()
///     .table_name("accounts")
///     .region("eu-west-1")
///     .build();
/// assert_eq!(config.log_format, LogFormat::Text);
/// assert_eq!(config.log_level(), "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct UpdaterConfig {
    /// DynamoDB table holding the account entries.
    #[builder(default = String::from(DEFAULT_TABLE_NAME), setter(into))]
    pub table_name: String,

    /// Region of the accounts table. Unset means the SDK default chain.
    #[builder(default, setter(strip_option, into))]
    pub region: Option<String>,

    /// Endpoint override for DynamoDB (local emulators).
    #[builder(default, setter(strip_option, into))]
    pub endpoint_url: Option<String>,

    /// Read entries from a DynamoDB-JSON export instead of the table.
    #[builder(default, setter(strip_option, into))]
    pub accounts_file: Option<PathBuf>,

    /// Enable debug logging.
    #[builder(default = false)]
    pub debug: bool,

    /// Log output format.
    #[builder(default)]
    pub log_format: LogFormat,

    /// What to do when some entries are rejected.
    #[builder(default)]
    pub invalid_entry_policy: InvalidEntryPolicy,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl UpdaterConfig {
    /// Tracing filter implied by the `debug` flag.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

/// Parse a boolean setting from the environment.
///
/// `1`, `true`, `enable`, `enabled`, `yes` and `on` (any case) are true;
/// everything else is false.
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "enable" | "enabled" | "yes" | "on"
    )
}
