use aws_sdk_dynamodb::Client;
use color_eyre::eyre::Result;

use stockmate::store::provision;

pub async fn command(client: &Client, table: &str) -> Result<()> {
    provision::create_inventory_table(client, table).await?;
    println!("Created table {table}");
    Ok(())
}
