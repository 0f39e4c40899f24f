//! Derived metrics: computed from the item list on every render, never stored.

use rust_decimal::Decimal;

use crate::model::InventoryItem;

/// Items with fewer units than this are flagged as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Low,
    Adequate,
}

pub fn classify_stock(item: &InventoryItem) -> StockLevel {
    if item.qty < LOW_STOCK_THRESHOLD {
        StockLevel::Low
    } else {
        StockLevel::Adequate
    }
}

pub fn line_total(item: &InventoryItem) -> Decimal {
    item.price * Decimal::from(item.qty)
}

pub fn total_value(items: &[InventoryItem]) -> Decimal {
    items.iter().map(line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn item(price: &str, qty: i64) -> InventoryItem {
        InventoryItem {
            id: format!("item-{price}-{qty}"),
            name: "test".to_string(),
            price: Decimal::from_str(price).unwrap(),
            qty,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn total_value_of_empty_list_is_zero() {
        assert_eq!(total_value(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_value_sums_line_totals() {
        let items = [item("10", 2), item("3", 1)];
        assert_eq!(total_value(&items), Decimal::from(23));
    }

    #[test]
    fn zero_price_or_qty_contributes_nothing() {
        let items = [item("0", 7), item("9.99", 0)];
        assert_eq!(total_value(&items), Decimal::ZERO);
    }

    #[test]
    fn fractional_prices_accumulate_exactly() {
        let items = [item("0.10", 3), item("0.20", 1)];
        assert_eq!(total_value(&items), Decimal::from_str("0.50").unwrap());
    }

    #[test]
    fn low_stock_boundary() {
        assert_eq!(classify_stock(&item("1", 4)), StockLevel::Low);
        assert_eq!(classify_stock(&item("1", 5)), StockLevel::Adequate);
        assert_eq!(classify_stock(&item("1", 0)), StockLevel::Low);
    }
}
