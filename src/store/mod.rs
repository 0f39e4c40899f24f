//! The record store client: CRUD against the remote inventory table.
//!
//! Mutations do not return the written record; callers re-list to observe
//! their effect. No operation retries automatically.

pub mod provision;
pub mod request;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    Client,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::RequestId,
    types::AttributeValue,
};
use chrono::Utc;
use ulid::Ulid;

use crate::model::{self, InventoryItem, ItemPayload};
pub use request::send_store_request;

pub const DEFAULT_TABLE: &str = "inventory";

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The full collection, newest first.
    async fn list_all(&self) -> Result<Vec<InventoryItem>, StoreError>;
    async fn create(&self, payload: &ItemPayload) -> Result<(), StoreError>;
    async fn update(&self, id: &str, payload: &ItemPayload) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// `RecordStore` over a single DynamoDB table.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl RecordStore for DynamoStore {
    async fn list_all(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let span = tracing::trace_span!(
                "Scan",
                table = %self.table,
                start_key_present = start_key.is_some()
            );
            let request = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take());
            let output = send_store_request(span, || request.send())
                .await
                .map_err(|err| StoreError::new(format_sdk_error(&err)))?;

            for attrs in output.items() {
                match model::from_attributes(attrs) {
                    Ok(item) => items.push(item),
                    Err(err) => tracing::warn!(
                        table = %self.table,
                        error = %err,
                        "skipping malformed record"
                    ),
                }
            }

            match output.last_evaluated_key() {
                Some(key) => start_key = Some(key.clone()),
                None => break,
            }
        }

        // ULIDs are time-ordered, so the id tie-break keeps same-instant
        // creations in insertion order.
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        tracing::debug!(table = %self.table, count = items.len(), "list_all");
        Ok(items)
    }

    async fn create(&self, payload: &ItemPayload) -> Result<(), StoreError> {
        let item = InventoryItem {
            id: Ulid::new().to_string(),
            name: payload.name.clone(),
            price: payload.price,
            qty: payload.qty,
            created_at: Utc::now(),
        };
        let span = tracing::trace_span!("PutItem", table = %self.table, id = %item.id);
        let request = self
            .client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(model::to_attributes(&item)));
        send_store_request(span, || request.send())
            .await
            .map(|_| ())
            .map_err(|err| StoreError::new(format_sdk_error(&err)))
    }

    async fn update(&self, id: &str, payload: &ItemPayload) -> Result<(), StoreError> {
        let span = tracing::trace_span!("UpdateItem", table = %self.table, id = %id);
        // name is a DynamoDB reserved word, hence the alias. The condition
        // keeps an update of a concurrently deleted item from resurrecting it
        // as a partial row.
        let request = self
            .client
            .update_item()
            .table_name(&self.table)
            .key(model::ATTR_ID, AttributeValue::S(id.to_string()))
            .update_expression("SET #name = :name, price = :price, qty = :qty")
            .condition_expression("attribute_exists(id)")
            .expression_attribute_names("#name", model::ATTR_NAME)
            .expression_attribute_values(":name", AttributeValue::S(payload.name.clone()))
            .expression_attribute_values(":price", AttributeValue::N(payload.price.to_string()))
            .expression_attribute_values(":qty", AttributeValue::N(payload.qty.to_string()));
        send_store_request(span, || request.send())
            .await
            .map(|_| ())
            .map_err(|err| StoreError::new(format_sdk_error(&err)))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let span = tracing::trace_span!("DeleteItem", table = %self.table, id = %id);
        let request = self
            .client
            .delete_item()
            .table_name(&self.table)
            .key(model::ATTR_ID, AttributeValue::S(id.to_string()));
        send_store_request(span, || request.send())
            .await
            .map(|_| ())
            .map_err(|err| StoreError::new(format_sdk_error(&err)))
    }
}

pub fn format_sdk_error<E>(err: &SdkError<E>) -> String
where
    E: ProvideErrorMetadata + RequestId + std::error::Error + 'static,
{
    if let Some(service_err) = err.as_service_error() {
        let code = service_err.code().unwrap_or("ServiceError");
        let message = service_err.message().unwrap_or("").trim();
        let mut summary = if message.is_empty() {
            code.to_string()
        } else {
            format!("{code}: {message}")
        };
        if let Some(request_id) = service_err.request_id() {
            summary.push_str(&format!(" (request id: {request_id})"));
        }
        return summary;
    }
    DisplayErrorContext(err).to_string()
}
