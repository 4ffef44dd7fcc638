use mongodb::{Client, bson::doc, options::ClientOptions};
use tracing::{info, instrument};

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};

/// Build a client from `config` and verify the server answers a `ping`.
///
/// The driver connects lazily, so the ping is what surfaces an unreachable
/// server at startup instead of on the first request.
#[instrument(skip(config), fields(url = %config.redacted_url(), database = %config.database))]
pub async fn connect(config: &MongoConfig) -> DatabaseResult<Client> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.server_selection_timeout);
    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;

    client
        .database(&config.database)
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect`] with exponential backoff; `None` uses [`RetryConfig::default`].
pub async fn connect_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Client> {
    match retry_config {
        Some(policy) => retry_with_backoff(|| connect(config), policy).await,
        None => retry(|| connect(config)).await,
    }
}

/// Close pooled connections and end server sessions.
///
/// Consumes the client; any clones still alive fail their next operation.
pub async fn disconnect(client: Client) {
    client.shutdown().await;
    info!("MongoDB client shut down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let config = MongoConfig::new("not-a-mongo-url");
        let err = connect(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Mongo(_)));
    }

    #[tokio::test]
    async fn test_connect_reports_unreachable_server() {
        let mut config = MongoConfig::new("mongodb://127.0.0.1:1");
        config.server_selection_timeout = Duration::from_millis(200);
        config.connect_timeout = Duration::from_millis(200);

        let err = connect(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ConnectionFailed(_)));
    }
}
