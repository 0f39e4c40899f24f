use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;

pub const ATTR_ID: &str = "id";
pub const ATTR_NAME: &str = "name";
pub const ATTR_PRICE: &str = "price";
pub const ATTR_QTY: &str = "qty";
pub const ATTR_CREATED_AT: &str = "created_at";

/// A single product record as stored in the inventory table. `id` and
/// `created_at` are assigned by the store client at creation and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub qty: i64,
    pub created_at: DateTime<Utc>,
}

/// Validated mutation payload: what a create or update sends to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPayload {
    pub name: String,
    pub price: Decimal,
    pub qty: i64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DecodeError {
    #[error("missing attribute {0}")]
    Missing(&'static str),
    #[error("attribute {0} has the wrong type")]
    WrongType(&'static str),
    #[error("attribute {0} failed to parse: {1}")]
    Unparseable(&'static str, String),
}

impl InventoryItem {
    pub fn to_json(&self) -> serde_json::Value {
        // Price as an exact decimal string; a float would lose cents.
        json!({
            ATTR_ID: self.id,
            ATTR_NAME: self.name,
            ATTR_PRICE: self.price.to_string(),
            ATTR_QTY: self.qty,
            ATTR_CREATED_AT: self.created_at.to_rfc3339(),
        })
    }
}

pub fn to_attributes(item: &InventoryItem) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (ATTR_ID.to_string(), AttributeValue::S(item.id.clone())),
        (ATTR_NAME.to_string(), AttributeValue::S(item.name.clone())),
        (
            ATTR_PRICE.to_string(),
            AttributeValue::N(item.price.to_string()),
        ),
        (ATTR_QTY.to_string(), AttributeValue::N(item.qty.to_string())),
        (
            ATTR_CREATED_AT.to_string(),
            AttributeValue::S(item.created_at.to_rfc3339()),
        ),
    ])
}

pub fn from_attributes(attrs: &HashMap<String, AttributeValue>) -> Result<InventoryItem, DecodeError> {
    let created_at_raw = text(attrs, ATTR_CREATED_AT)?;
    let created_at = DateTime::parse_from_rfc3339(created_at_raw)
        .map_err(|err| DecodeError::Unparseable(ATTR_CREATED_AT, err.to_string()))?
        .with_timezone(&Utc);
    Ok(InventoryItem {
        id: text(attrs, ATTR_ID)?.to_string(),
        name: text(attrs, ATTR_NAME)?.to_string(),
        price: number(attrs, ATTR_PRICE)?,
        qty: number(attrs, ATTR_QTY)?,
        created_at,
    })
}

fn text<'a>(
    attrs: &'a HashMap<String, AttributeValue>,
    name: &'static str,
) -> Result<&'a str, DecodeError> {
    let value = attrs.get(name).ok_or(DecodeError::Missing(name))?;
    value
        .as_s()
        .map(String::as_str)
        .map_err(|_| DecodeError::WrongType(name))
}

fn number<T: std::str::FromStr>(
    attrs: &HashMap<String, AttributeValue>,
    name: &'static str,
) -> Result<T, DecodeError>
where
    T::Err: std::fmt::Display,
{
    let value = attrs.get(name).ok_or(DecodeError::Missing(name))?;
    let raw = value.as_n().map_err(|_| DecodeError::WrongType(name))?;
    raw.parse()
        .map_err(|err: T::Err| DecodeError::Unparseable(name, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_attrs() -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                ATTR_ID.to_string(),
                AttributeValue::S("01J0000000000000000000TEST".to_string()),
            ),
            (ATTR_NAME.to_string(), AttributeValue::S("Pen".to_string())),
            (ATTR_PRICE.to_string(), AttributeValue::N("1.50".to_string())),
            (ATTR_QTY.to_string(), AttributeValue::N("10".to_string())),
            (
                ATTR_CREATED_AT.to_string(),
                AttributeValue::S("2026-01-01T00:00:00+00:00".to_string()),
            ),
        ])
    }

    #[test]
    fn decodes_a_row() {
        let item = from_attributes(&sample_attrs()).unwrap();
        assert_eq!(item.name, "Pen");
        assert_eq!(item.price, Decimal::from_str("1.50").unwrap());
        assert_eq!(item.qty, 10);
    }

    #[test]
    fn missing_attribute_is_an_error() {
        let mut attrs = sample_attrs();
        attrs.remove(ATTR_PRICE);
        let err = from_attributes(&attrs).unwrap_err();
        assert!(matches!(err, DecodeError::Missing(ATTR_PRICE)));
    }

    #[test]
    fn non_numeric_qty_is_an_error() {
        let mut attrs = sample_attrs();
        attrs.insert(ATTR_QTY.to_string(), AttributeValue::N("lots".to_string()));
        let err = from_attributes(&attrs).unwrap_err();
        assert!(matches!(err, DecodeError::Unparseable(ATTR_QTY, _)));
    }

    #[test]
    fn json_projection_keeps_price_exact() {
        let item = from_attributes(&sample_attrs()).unwrap();
        let value = item.to_json();
        assert_eq!(value["price"], "1.50");
        assert_eq!(value["qty"], 10);
    }
}
