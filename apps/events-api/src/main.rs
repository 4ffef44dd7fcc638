use axum::middleware;
use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::{connect_with_retry, disconnect};
use observability::{init_metrics, metrics_middleware};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StoreConfig};
use state::{AppState, StoreHandle};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);
    init_metrics()?;

    info!(
        name = config.app.name,
        version = config.app.version,
        "Starting events API"
    );

    let store = match &config.store {
        StoreConfig::MongoDb(mongo) => {
            info!("Connecting to MongoDB at {}", mongo.redacted_url());

            let client = connect_with_retry(mongo, None).await?;
            let database = client.database(mongo.database());
            api::events::init_indexes(&database).await?;

            info!("Using MongoDB database: {}", mongo.database());
            StoreHandle::MongoDb { client, database }
        }
        StoreConfig::Memory => {
            info!("Using in-memory event store; records are lost on restart");
            StoreHandle::Memory
        }
    };

    let state = AppState { config, store };

    let router = axum_helpers::create_router::<openapi::ApiDoc>(api::routes(&state)).await?;
    let app = router.layer(middleware::from_fn(metrics_middleware));

    let mongo_client = match &state.store {
        StoreHandle::MongoDb { client, .. } => Some(client.clone()),
        StoreHandle::Memory => None,
    };

    create_production_app(app, &state.config.server, async move {
        if let Some(client) = mongo_client {
            info!("Shutting down: closing MongoDB connections");
            disconnect(client).await;
        }
    })
    .await?;

    info!("Events API shutdown complete");
    Ok(())
}
