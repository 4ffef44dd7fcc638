//! MongoDB client construction and probes

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{connect, connect_with_retry, disconnect};
pub use health::{HealthStatus, check_health_detailed};

pub use mongodb::{Client, Collection, Database};
