//! DynamoDB storage for sgupdater account entries.
//!
//! [`DynamoDbAccountRepository`] implements
//! [`AccountRepository`](sgupdater_core::AccountRepository) with a full table
//! scan through `aws-sdk-dynamodb`, converting SDK attribute values into the
//! model's [`AttributeValue`](sgupdater_model::AttributeValue).
#![allow(clippy::doc_markdown)]

mod repository;

pub use repository::{DynamoDbAccountRepository, UnsupportedAttribute, convert_item};
