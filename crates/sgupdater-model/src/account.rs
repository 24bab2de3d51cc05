//! Account entry types.
//!
//! [`AccountCandidate`] is what comes out of storage: every field optional,
//! possibly empty. [`AccountEntry`] is the normalized form handed to the
//! security-group updater, with every optional field populated.

use std::collections::BTreeSet;

use serde::Serialize;
use typed_builder::TypedBuilder;

/// Ports opened when an entry does not list any.
pub const DEFAULT_ALLOW_PORTS: [i32; 2] = [80, 443];
/// IAM role assumed in the target account.
pub const DEFAULT_ROLE_NAME: &str = "STS-UpdateSonarCloudSecurityGroupsRole";
/// STS session name used when assuming the role.
pub const DEFAULT_SESSION_NAME: &str = "UpdateSonarCloudSecurityGroupsFunction";
/// STS session lifetime (30 minutes).
pub const DEFAULT_DURATION_SECONDS: i32 = 1800;
/// Tag key marking security groups managed by the updater.
pub const DEFAULT_TAG_NAME: &str = "fn.imperva.com/UpdateSonarCloudSecurityGroups/state";
/// Tag value for groups whose rules the updater owns entirely.
pub const DEFAULT_EXCLUSIVE_TAG_VALUE: &str = "exclusive";
/// Tag value for groups where the updater only manages its own rules.
pub const DEFAULT_MANAGED_TAG_VALUE: &str = "managed";
/// Description written on managed rules.
pub const DEFAULT_DESCRIPTION: &str =
    "Managed by UpdateSonarCloudSecurityGroups function (DO NOT MODIFY)";

/// Attribute names as stored in the accounts table.
pub mod attr {
    /// Opaque entry identifier.
    pub const ENTRY_ID: &str = "EntryID";
    /// Target AWS account.
    pub const ACCOUNT_ID: &str = "AccountID";
    /// Ports to allow.
    pub const ALLOW_PORTS: &str = "AllowPorts";
    /// Regions to manage.
    pub const REGIONS: &str = "Regions";
    /// Role to assume.
    pub const ROLE_NAME: &str = "RoleName";
    /// STS session name.
    pub const SESSION_NAME: &str = "SessionName";
    /// STS session lifetime.
    pub const DURATION_SECONDS: &str = "DurationSeconds";
    /// STS external ID.
    pub const EXTERNAL_ID: &str = "ExternalID";
    /// Management tag key.
    pub const TAG_NAME: &str = "TagName";
    /// Exclusive tag values.
    pub const EXCLUSIVE_TAG_VALUES: &str = "ExclusiveTagValues";
    /// Managed tag values.
    pub const MANAGED_TAG_VALUES: &str = "ManagedTagValues";
    /// Rule description.
    pub const DESCRIPTION: &str = "Description";
}

/// A raw account record decoded from storage, before validation.
///
/// # Examples
///
/// ```
/// use sgupdater_model::AccountCandidate;
///
/// let candidate = AccountCandidate::builder()
///     .account_id("123456789012")
///     .regions(vec!["us-east-1".to_owned()])
///     .build();
/// assert!(candidate.role_name.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
#[builder(field_defaults(default, setter(strip_option, into)))]
pub struct AccountCandidate {
    /// Opaque entry identifier.
    pub entry_id: Option<String>,
    /// Target AWS account ID.
    pub account_id: Option<String>,
    /// Ports to allow.
    pub allow_ports: Option<BTreeSet<i32>>,
    /// Regions to manage, in stored order.
    pub regions: Option<Vec<String>>,
    /// IAM role name to assume.
    pub role_name: Option<String>,
    /// STS session name.
    pub session_name: Option<String>,
    /// STS session lifetime in seconds.
    pub duration_seconds: Option<i32>,
    /// STS external ID.
    pub external_id: Option<String>,
    /// Tag key used to mark managed resources.
    pub tag_name: Option<String>,
    /// Tag values marking exclusively managed groups.
    pub exclusive_tag_values: Option<BTreeSet<String>>,
    /// Tag values marking partially managed groups.
    pub managed_tag_values: Option<BTreeSet<String>>,
    /// Description written on managed rules.
    pub description: Option<String>,
}

/// A validated account entry with every optional field populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountEntry {
    /// Opaque entry identifier.
    #[serde(rename = "EntryID", skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    /// Target AWS account ID; never empty.
    #[serde(rename = "AccountID")]
    pub account_id: String,
    /// Ports to allow; never empty.
    pub allow_ports: BTreeSet<i32>,
    /// Regions to manage; never empty.
    pub regions: Vec<String>,
    /// IAM role name to assume.
    pub role_name: String,
    /// STS session name.
    pub session_name: String,
    /// STS session lifetime in seconds; always positive.
    pub duration_seconds: i32,
    /// STS external ID.
    #[serde(rename = "ExternalID", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Tag key used to mark managed resources.
    pub tag_name: String,
    /// Tag values marking exclusively managed groups; never empty.
    pub exclusive_tag_values: BTreeSet<String>,
    /// Tag values marking partially managed groups; never empty.
    pub managed_tag_values: BTreeSet<String>,
    /// Description written on managed rules.
    pub description: String,
}

impl From<AccountEntry> for AccountCandidate {
    fn from(entry: AccountEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            account_id: Some(entry.account_id),
            allow_ports: Some(entry.allow_ports),
            regions: Some(entry.regions),
            role_name: Some(entry.role_name),
            session_name: Some(entry.session_name),
            duration_seconds: Some(entry.duration_seconds),
            external_id: entry.external_id,
            tag_name: Some(entry.tag_name),
            exclusive_tag_values: Some(entry.exclusive_tag_values),
            managed_tag_values: Some(entry.managed_tag_values),
            description: Some(entry.description),
        }
    }
}
