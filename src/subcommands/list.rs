use aws_sdk_dynamodb::Client;
use color_eyre::eyre::Result;
use unicode_width::UnicodeWidthStr;

use stockmate::metrics::{self, StockLevel};
use stockmate::store::{DynamoStore, RecordStore};

pub struct Options {
    pub json: bool,
}

/// Prints the table contents, newest first, either as a plain-text table or
/// as a JSON array for scripting.
pub async fn command(client: &Client, table: &str, options: &Options) -> Result<()> {
    let store = DynamoStore::new(client.clone(), table);
    let items = store.list_all().await?;

    if options.json {
        let values: Vec<_> = items.iter().map(|item| item.to_json()).collect();
        println!("{}", serde_json::to_string(&values)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No items in {table}");
        return Ok(());
    }

    let name_width = items
        .iter()
        .map(|item| UnicodeWidthStr::width(item.name.as_str()))
        .max()
        .unwrap_or(0)
        .max("PRODUCT".len());

    println!(
        "{:<name_width$}  {:>6}  {:>12}  {:>14}  STOCK",
        "PRODUCT", "QTY", "PRICE", "TOTAL"
    );
    for item in &items {
        // Decimal ignores format width flags, so pad the rendered string.
        let price = format!("{:>12}", item.price.to_string());
        let total = format!("{:>14}", metrics::line_total(item).to_string());
        let flag = match metrics::classify_stock(item) {
            StockLevel::Low => "LOW",
            StockLevel::Adequate => "",
        };
        println!(
            "{:<name_width$}  {:>6}  {price}  {total}  {flag}",
            item.name, item.qty
        );
    }
    println!(
        "Total value: {} ({} products)",
        metrics::total_value(&items),
        items.len()
    );
    Ok(())
}
