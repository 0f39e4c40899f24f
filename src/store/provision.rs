use std::time::Duration;

use aws_sdk_dynamodb::{
    Client,
    types::{
        AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
        TableStatus,
    },
};

use super::{StoreError, format_sdk_error};
use crate::model;

const ACTIVE_POLL_ATTEMPTS: u32 = 40;
const ACTIVE_POLL_DELAY: Duration = Duration::from_millis(250);

/// Creates the backing inventory table: `id` string hash key, on-demand
/// billing. Waits until the table is active so callers can write immediately.
pub async fn create_inventory_table(client: &Client, table: &str) -> Result<(), StoreError> {
    let key_schema = KeySchemaElement::builder()
        .attribute_name(model::ATTR_ID)
        .key_type(KeyType::Hash)
        .build()
        .map_err(|err| StoreError::new(err.to_string()))?;
    let attribute_def = AttributeDefinition::builder()
        .attribute_name(model::ATTR_ID)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|err| StoreError::new(err.to_string()))?;

    client
        .create_table()
        .table_name(table)
        .key_schema(key_schema)
        .attribute_definitions(attribute_def)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(|err| StoreError::new(format_sdk_error(&err)))?;

    wait_until_active(client, table).await
}

async fn wait_until_active(client: &Client, table: &str) -> Result<(), StoreError> {
    for attempt in 0..ACTIVE_POLL_ATTEMPTS {
        match client.describe_table().table_name(table).send().await {
            Ok(output) => {
                let status = output.table().and_then(|desc| desc.table_status().cloned());
                if matches!(status, Some(TableStatus::Active)) {
                    return Ok(());
                }
                tracing::trace!(table = %table, ?status, attempt, "table not active yet");
            }
            Err(err) => {
                tracing::trace!(table = %table, error = ?err, attempt, "describe_table failed");
            }
        }
        tokio::time::sleep(ACTIVE_POLL_DELAY).await;
    }
    Err(StoreError::new(format!(
        "table {table} did not become active"
    )))
}
