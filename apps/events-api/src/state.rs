//! Application state shared by the route builders.

use mongodb::{Client, Database};

use crate::config::Config;

/// Store handle opened at startup
#[derive(Clone)]
pub enum StoreHandle {
    MongoDb {
        /// Shares the underlying connection pool when cloned
        client: Client,
        database: Database,
    },
    Memory,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: StoreHandle,
}
