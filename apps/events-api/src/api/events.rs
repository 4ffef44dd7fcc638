//! Event routes bound to the configured store

use axum::Router;
use domain_events::{EventService, InMemoryEventRepository, MongoEventRepository};
use mongodb::Database;
use tracing::info;

use crate::state::{AppState, StoreHandle};

/// Ensure the event collection indexes exist
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoEventRepository::new(db).create_indexes().await?;
    info!("Event indexes initialized");
    Ok(())
}

pub fn router(state: &AppState) -> Router {
    match &state.store {
        StoreHandle::MongoDb { database, .. } => {
            domain_events::router(EventService::new(MongoEventRepository::new(database)))
        }
        StoreHandle::Memory => {
            domain_events::router(EventService::new(InMemoryEventRepository::new()))
        }
    }
}
