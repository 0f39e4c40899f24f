use aws_config::BehaviorVersion;
use aws_config::environment::{
    credentials::EnvironmentVariableCredentialsProvider, region::EnvironmentVariableRegionProvider,
};
use aws_config::meta::region::ProvideRegion;
use aws_sdk_dynamodb::config::ProvideCredentials;
use color_eyre::eyre::{Context, Result, eyre};

/// Builds the DynamoDB client from the environment. Region and credentials
/// come from the usual AWS variables; `endpoint_url` points the client at a
/// local stack such as dynamodb-local.
pub async fn new_client(endpoint_url: Option<&str>) -> Result<aws_sdk_dynamodb::Client> {
    let region = EnvironmentVariableRegionProvider::new()
        .region()
        .await
        .ok_or_else(|| eyre!("AWS region not set. Use AWS_REGION or AWS_DEFAULT_REGION."))?;

    let credentials_provider = EnvironmentVariableCredentialsProvider::new();
    credentials_provider
        .provide_credentials()
        .await
        .map_err(|err| eyre!("AWS credentials not found in environment: {err}"))?;

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(region)
        .credentials_provider(credentials_provider);
    if let Some(url) = endpoint_url {
        loader = loader.endpoint_url(url);
    }

    let config = loader.load().await;
    Ok(aws_sdk_dynamodb::Client::new(&config))
}

/// Cheap probe that the inventory table is reachable before entering the TUI.
pub async fn validate_connection(client: &aws_sdk_dynamodb::Client, table: &str) -> Result<()> {
    client
        .describe_table()
        .table_name(table)
        .send()
        .await
        .map(|_| ())
        .wrap_err_with(|| format!("Failed to reach inventory table {table}"))
}
