//! Account entry model for sgupdater.
//!
//! Defines the schema of an account entry as stored in the accounts table,
//! the DynamoDB `AttributeValue` representation of stored records, and the
//! decoding step from a stored item to an [`AccountCandidate`].
// "DynamoDB" appears in most doc comments in this crate.
#![allow(clippy::doc_markdown)]

pub mod account;
pub mod attribute_value;
pub mod decode;

pub use account::{AccountCandidate, AccountEntry};
pub use attribute_value::{AttributeValue, Item};
pub use decode::{DecodeError, decode_candidate};
