//! Mapping stored items onto [`AccountCandidate`].
//!
//! The decoder only checks shapes. Whether a record is usable is decided by
//! the validator, so absent, `NULL` and empty attributes all decode to an
//! unset or empty field here.

use std::collections::BTreeSet;

use crate::account::{AccountCandidate, attr};
use crate::attribute_value::{AttributeValue, Item};

/// A stored record that does not match the account schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The attribute holds a different DynamoDB type than the schema expects.
    #[error("attribute {attribute}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Attribute name.
        attribute: String,
        /// Accepted type descriptors.
        expected: &'static str,
        /// Type descriptor actually stored.
        found: &'static str,
    },

    /// A number attribute (or set element) is not a 32-bit integer.
    #[error("attribute {attribute}: {value:?} is not a valid 32-bit integer")]
    InvalidNumber {
        /// Attribute name.
        attribute: String,
        /// Raw number string.
        value: String,
    },
}

impl DecodeError {
    /// Name of the offending attribute.
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            Self::TypeMismatch { attribute, .. } | Self::InvalidNumber { attribute, .. } => {
                attribute
            }
        }
    }
}

/// Decode one stored item into an account candidate.
///
/// Unknown attributes are ignored.
pub fn decode_candidate(item: &Item) -> Result<AccountCandidate, DecodeError> {
    Ok(AccountCandidate {
        entry_id: string(item, attr::ENTRY_ID)?,
        account_id: string(item, attr::ACCOUNT_ID)?,
        allow_ports: number_set(item, attr::ALLOW_PORTS)?,
        regions: string_list(item, attr::REGIONS)?,
        role_name: string(item, attr::ROLE_NAME)?,
        session_name: string(item, attr::SESSION_NAME)?,
        duration_seconds: number(item, attr::DURATION_SECONDS)?,
        external_id: string(item, attr::EXTERNAL_ID)?,
        tag_name: string(item, attr::TAG_NAME)?,
        exclusive_tag_values: string_list(item, attr::EXCLUSIVE_TAG_VALUES)?
            .map(BTreeSet::from_iter),
        managed_tag_values: string_list(item, attr::MANAGED_TAG_VALUES)?
            .map(BTreeSet::from_iter),
        description: string(item, attr::DESCRIPTION)?,
    })
}

fn present<'a>(item: &'a Item, name: &str) -> Option<&'a AttributeValue> {
    item.get(name).filter(|v| !v.is_null())
}

fn mismatch(name: &str, expected: &'static str, found: &AttributeValue) -> DecodeError {
    DecodeError::TypeMismatch {
        attribute: name.to_owned(),
        expected,
        found: found.type_descriptor(),
    }
}

fn parse_i32(name: &str, raw: &str) -> Result<i32, DecodeError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| DecodeError::InvalidNumber {
            attribute: name.to_owned(),
            value: raw.to_owned(),
        })
}

fn string(item: &Item, name: &str) -> Result<Option<String>, DecodeError> {
    let Some(value) = present(item, name) else {
        return Ok(None);
    };
    value
        .as_s()
        .map(|s| Some(s.to_owned()))
        .ok_or_else(|| mismatch(name, "S", value))
}

fn number(item: &Item, name: &str) -> Result<Option<i32>, DecodeError> {
    let Some(value) = present(item, name) else {
        return Ok(None);
    };
    let raw = value.as_n().ok_or_else(|| mismatch(name, "N", value))?;
    parse_i32(name, raw).map(Some)
}

fn string_list(item: &Item, name: &str) -> Result<Option<Vec<String>>, DecodeError> {
    let Some(value) = present(item, name) else {
        return Ok(None);
    };
    match value {
        AttributeValue::Ss(values) => Ok(Some(values.clone())),
        AttributeValue::L(elements) => elements
            .iter()
            .map(|e| {
                e.as_s()
                    .map(ToOwned::to_owned)
                    .ok_or_else(|| mismatch(name, "SS or L of S", e))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        other => Err(mismatch(name, "SS or L of S", other)),
    }
}

fn number_set(item: &Item, name: &str) -> Result<Option<BTreeSet<i32>>, DecodeError> {
    let Some(value) = present(item, name) else {
        return Ok(None);
    };
    match value {
        AttributeValue::Ns(values) => values
            .iter()
            .map(|raw| parse_i32(name, raw))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Some),
        AttributeValue::L(elements) => elements
            .iter()
            .map(|e| {
                let raw = e.as_n().ok_or_else(|| mismatch(name, "NS or L of N", e))?;
                parse_i32(name, raw)
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Some),
        other => Err(mismatch(name, "NS or L of N", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> AttributeValue {
        AttributeValue::S(v.to_owned())
    }

    fn n(v: &str) -> AttributeValue {
        AttributeValue::N(v.to_owned())
    }

    fn item(pairs: Vec<(&str, AttributeValue)>) -> Item {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect()
    }

    #[test]
    fn test_should_decode_full_item() {
        let item = item(vec![
            ("EntryID", s("prod")),
            ("AccountID", s("123456789012")),
            ("AllowPorts", AttributeValue::Ns(vec!["443".into(), "8443".into()])),
            ("Regions", AttributeValue::L(vec![s("us-west-2"), s("us-east-1")])),
            ("RoleName", s("CustomRole")),
            ("SessionName", s("CustomSession")),
            ("DurationSeconds", n("900")),
            ("ExternalID", s("ext-1")),
            ("TagName", s("example.com/state")),
            ("ExclusiveTagValues", AttributeValue::Ss(vec!["only".into()])),
            ("ManagedTagValues", AttributeValue::L(vec![s("shared"), s("managed")])),
            ("Description", s("custom")),
        ]);

        let candidate = decode_candidate(&item).unwrap();

        assert_eq!(candidate.entry_id.as_deref(), Some("prod"));
        assert_eq!(candidate.allow_ports, Some(BTreeSet::from([443, 8443])));
        assert_eq!(
            candidate.regions,
            Some(vec!["us-west-2".to_owned(), "us-east-1".to_owned()])
        );
        assert_eq!(candidate.duration_seconds, Some(900));
        assert_eq!(candidate.external_id.as_deref(), Some("ext-1"));
        assert_eq!(
            candidate.managed_tag_values,
            Some(BTreeSet::from(["managed".to_owned(), "shared".to_owned()]))
        );
        assert_eq!(candidate.description.as_deref(), Some("custom"));
    }

    #[test]
    fn test_should_leave_missing_and_null_attributes_unset() {
        let item = item(vec![
            ("AccountID", s("123")),
            ("RoleName", AttributeValue::Null(true)),
        ]);

        let candidate = decode_candidate(&item).unwrap();

        assert_eq!(candidate.account_id.as_deref(), Some("123"));
        assert!(candidate.role_name.is_none());
        assert!(candidate.regions.is_none());
        assert!(candidate.allow_ports.is_none());
    }

    #[test]
    fn test_should_ignore_unknown_attributes() {
        let item = item(vec![("Owner", s("team-a")), ("AccountID", s("123"))]);
        let candidate = decode_candidate(&item).unwrap();
        assert_eq!(candidate.account_id.as_deref(), Some("123"));
    }

    #[test]
    fn test_should_accept_list_of_numbers_for_ports() {
        let item = item(vec![("AllowPorts", AttributeValue::L(vec![n("22"), n("22")]))]);
        let candidate = decode_candidate(&item).unwrap();
        assert_eq!(candidate.allow_ports, Some(BTreeSet::from([22])));
    }

    #[test]
    fn test_should_report_type_mismatch() {
        let item = item(vec![("AccountID", n("123456789012"))]);

        let err = decode_candidate(&item).unwrap_err();

        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                attribute: "AccountID".to_owned(),
                expected: "S",
                found: "N",
            }
        );
        assert_eq!(err.attribute(), "AccountID");
    }

    #[test]
    fn test_should_report_mismatched_list_element() {
        let item = item(vec![("Regions", AttributeValue::L(vec![s("us-east-1"), n("1")]))]);
        let err = decode_candidate(&item).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { found: "N", .. }));
    }

    #[test]
    fn test_should_report_invalid_number() {
        let item = item(vec![("DurationSeconds", n("1.5"))]);

        let err = decode_candidate(&item).unwrap_err();

        assert_eq!(err.attribute(), "DurationSeconds");
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_should_report_out_of_range_port() {
        let item = item(vec![("AllowPorts", AttributeValue::Ns(vec!["99999999999".into()]))]);
        let err = decode_candidate(&item).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));
    }
}
