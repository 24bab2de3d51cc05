//! sgupdater - loads the account entries for the security-group updater.
//!
//! Reads every stored account entry (from DynamoDB, or from a DynamoDB-JSON
//! export), validates each one independently, fills in defaults, and prints
//! the validated entries as JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! ACCOUNTS_TABLE=accounts AWS_REGION=us-east-1 sgupdater
//! sgupdater --accounts-file accounts.json --fail-on-invalid
//! ```
//!
//! # Environment Variables
//!
//! Flags take precedence over environment variables, which take precedence
//! over the defaults.
//!
//! | Variable | Flag | Default | Description |
//! |----------|------|---------|-------------|
//! | `ACCOUNTS_TABLE` | `--table` | `UpdateSonarCloudSecurityGroupsAccounts` | Table to scan |
//! | `AWS_REGION` | `--region` | *(SDK default chain)* | Region of the table |
//! | `DYNAMODB_ENDPOINT_URL` | `--endpoint-url` | *(unset)* | Endpoint override |
//! | `ACCOUNTS_FILE` | `--accounts-file` | *(unset)* | Read a DynamoDB-JSON export instead |
//! | `DEBUG` | `--debug` | `false` | Enable debug logging |
//! | `LOG_FORMAT` | `--log-format` | `text` | `text` or `json` |
//! | `FAIL_ON_INVALID` | `--fail-on-invalid` | `false` | Exit non-zero if any entry is rejected |
//! | `RUST_LOG` | | *(unset)* | Fine-grained tracing filter (overrides `DEBUG`) |

mod cli;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use sgupdater_core::{
    AccountRepository, FileAccountRepository, LogFormat, UpdaterConfig, load_accounts,
};
use sgupdater_dynamodb::DynamoDbAccountRepository;
use sgupdater_model::AccountEntry;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the tracing filter.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `debug` setting.
fn build_filter(config: &UpdaterConfig, rust_log: Option<&str>) -> Result<EnvFilter> {
    let directives = rust_log.unwrap_or_else(|| config.log_level());
    EnvFilter::try_new(directives)
        .with_context(|| format!("invalid log level filter: {directives}"))
}

/// Initialize the tracing subscriber. Called once, before anything logs.
fn init_tracing(config: &UpdaterConfig) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(config, rust_log.as_deref())?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}

/// Pick the repository the configuration points at.
async fn build_repository(config: &UpdaterConfig) -> Box<dyn AccountRepository> {
    match &config.accounts_file {
        Some(path) => Box::new(FileAccountRepository::new(path)),
        None => Box::new(DynamoDbAccountRepository::from_config(config).await),
    }
}

/// Load, validate and apply the configured policy.
async fn run(config: &UpdaterConfig, repo: &dyn AccountRepository) -> Result<Vec<AccountEntry>> {
    let report = load_accounts(repo)
        .await
        .with_context(|| format!("failed to load account entries from {}", repo.name()))?;

    report
        .apply_policy(config.invalid_entry_policy)
        .context("invalid account entries found")
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse()
        .resolve()
        .context("failed to resolve configuration")?;
    init_tracing(&config)?;

    info!(
        version = VERSION,
        table = %config.table_name,
        source = if config.accounts_file.is_some() { "file" } else { "dynamodb" },
        "starting sgupdater"
    );

    let repo = build_repository(&config).await;
    let accounts = run(&config, repo.as_ref()).await?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &accounts).context("failed to write accounts")?;
    writeln!(stdout).context("failed to write accounts")?;

    info!(count = accounts.len(), "account entries written");
    Ok(())
}
