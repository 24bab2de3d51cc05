//! Account repository backed by a DynamoDB table.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue as SdkAttributeValue;
use sgupdater_core::{AccountRepository, FetchError, UpdaterConfig};
use sgupdater_model::{AttributeValue, Item};
use tracing::debug;

/// The SDK returned an attribute type this crate does not know about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attribute {attribute} has an unsupported type")]
pub struct UnsupportedAttribute {
    /// Attribute name in the item.
    pub attribute: String,
}

/// Reads account items with a full, paginated `Scan` of one table.
#[derive(Debug, Clone)]
pub struct DynamoDbAccountRepository {
    client: Client,
    table_name: String,
}

impl DynamoDbAccountRepository {
    /// Create a repository scanning `table_name` with an existing client.
    #[must_use]
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Build a client from the resolved configuration.
    ///
    /// Region and endpoint fall back to the SDK default chain when unset.
    pub async fn from_config(config: &UpdaterConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;

        Self::new(Client::new(&sdk_config), config.table_name.clone())
    }

    /// Name of the scanned table.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl AccountRepository for DynamoDbAccountRepository {
    fn name(&self) -> &str {
        &self.table_name
    }

    async fn fetch_all(&self) -> Result<Vec<Item>, FetchError> {
        let mut items = Vec::new();
        let mut start_key: Option<HashMap<String, SdkAttributeValue>> = None;
        let mut pages = 0_usize;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| FetchError::new(&self.table_name, e))?;
            pages += 1;

            for sdk_item in output.items() {
                let item =
                    convert_item(sdk_item).map_err(|e| FetchError::new(&self.table_name, e))?;
                items.push(item);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(
            table = %self.table_name,
            pages,
            count = items.len(),
            "scanned accounts table"
        );
        Ok(items)
    }
}

/// Convert one SDK item into the model representation.
pub fn convert_item(
    item: &HashMap<String, SdkAttributeValue>,
) -> Result<Item, UnsupportedAttribute> {
    item.iter()
        .map(|(name, value)| {
            convert_value(value)
                .map(|v| (name.clone(), v))
                .ok_or_else(|| UnsupportedAttribute {
                    attribute: name.clone(),
                })
        })
        .collect()
}

fn convert_value(value: &SdkAttributeValue) -> Option<AttributeValue> {
    let converted = match value {
        SdkAttributeValue::S(s) => AttributeValue::S(s.clone()),
        SdkAttributeValue::N(n) => AttributeValue::N(n.clone()),
        SdkAttributeValue::B(b) => AttributeValue::B(bytes::Bytes::copy_from_slice(b.as_ref())),
        SdkAttributeValue::Ss(v) => AttributeValue::Ss(v.clone()),
        SdkAttributeValue::Ns(v) => AttributeValue::Ns(v.clone()),
        SdkAttributeValue::Bs(v) => AttributeValue::Bs(
            v.iter()
                .map(|b| bytes::Bytes::copy_from_slice(b.as_ref()))
                .collect(),
        ),
        SdkAttributeValue::Bool(b) => AttributeValue::Bool(*b),
        SdkAttributeValue::Null(b) => AttributeValue::Null(*b),
        SdkAttributeValue::L(list) => {
            AttributeValue::L(list.iter().map(convert_value).collect::<Option<_>>()?)
        }
        SdkAttributeValue::M(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| convert_value(v).map(|v| (k.clone(), v)))
                .collect::<Option<_>>()?,
        ),
        _ => return None,
    };
    Some(converted)
}
