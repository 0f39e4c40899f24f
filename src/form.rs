//! Form state: the create-vs-edit duality and the text-to-payload coercion.

use rust_decimal::Decimal;

use crate::model::{InventoryItem, ItemPayload};

/// Raw, possibly invalid user input for the three form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub price: String,
    pub qty: String,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.price.is_empty() && self.qty.is_empty()
    }
}

/// The single edit session. No target means create mode.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    target: Option<String>,
    pub draft: Draft,
}

impl EditSession {
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.target.is_some()
    }

    pub fn begin_edit(&mut self, item: &InventoryItem) {
        self.target = Some(item.id.clone());
        self.draft = Draft {
            name: item.name.clone(),
            price: item.price.to_string(),
            qty: item.qty.to_string(),
        };
    }

    pub fn cancel_edit(&mut self) {
        self.clear();
    }

    /// Back to create mode with an empty draft. Called after a successful
    /// submit and by `cancel_edit`.
    pub fn clear(&mut self) {
        self.target = None;
        self.draft = Draft::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("price is not a valid number: {0:?}")]
    InvalidPrice(String),
    #[error("quantity is not a valid integer: {0:?}")]
    InvalidQty(String),
}

/// Coerces the draft into a payload. Type coercion only: negative price or
/// quantity pass through, matching the permissive store schema.
pub fn to_payload(draft: &Draft) -> Result<ItemPayload, ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let price = draft
        .price
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidPrice(draft.price.clone()))?;
    let qty = draft
        .qty
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidQty(draft.qty.clone()))?;
    Ok(ItemPayload {
        name: name.to_string(),
        price,
        qty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn draft(name: &str, price: &str, qty: &str) -> Draft {
        Draft {
            name: name.to_string(),
            price: price.to_string(),
            qty: qty.to_string(),
        }
    }

    #[test]
    fn parses_a_valid_draft() {
        let payload = to_payload(&draft("Widget", "2.50", "3")).unwrap();
        assert_eq!(payload.name, "Widget");
        assert_eq!(payload.price, Decimal::from_str("2.50").unwrap());
        assert_eq!(payload.qty, 3);
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            to_payload(&draft("", "10", "5")),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            to_payload(&draft("   ", "10", "5")),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        assert!(matches!(
            to_payload(&draft("Pen", "cheap", "5")),
            Err(ValidationError::InvalidPrice(_))
        ));
        assert!(matches!(
            to_payload(&draft("Pen", "1.5", "many")),
            Err(ValidationError::InvalidQty(_))
        ));
        assert!(matches!(
            to_payload(&draft("Pen", "1.5", "2.5")),
            Err(ValidationError::InvalidQty(_))
        ));
    }

    #[test]
    fn negative_values_pass_type_coercion() {
        let payload = to_payload(&draft("Refund", "-4.20", "-2")).unwrap();
        assert_eq!(payload.price, Decimal::from_str("-4.20").unwrap());
        assert_eq!(payload.qty, -2);
    }

    #[test]
    fn begin_then_cancel_edit_restores_create_mode() {
        let item = InventoryItem {
            id: "item-1".to_string(),
            name: "Pen".to_string(),
            price: Decimal::from_str("1.50").unwrap(),
            qty: 10,
            created_at: Utc::now(),
        };
        let mut session = EditSession::default();
        session.begin_edit(&item);
        assert!(session.is_editing());
        assert_eq!(session.target(), Some("item-1"));
        assert_eq!(session.draft, draft("Pen", "1.50", "10"));

        session.cancel_edit();
        assert!(!session.is_editing());
        assert!(session.draft.is_empty());
    }
}
