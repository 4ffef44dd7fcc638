use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Where event records are kept
#[derive(Clone, Debug)]
pub enum StoreConfig {
    MongoDb(MongoConfig),
    /// Process memory; contents are lost on restart
    Memory,
}

impl FromEnv for StoreConfig {
    /// `EVENT_STORE`: `mongodb` (default) or `memory`
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env_or_default("EVENT_STORE", "mongodb");

        match backend.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreConfig::MongoDb(MongoConfig::from_env()?)),
            "memory" => Ok(StoreConfig::Memory),
            _ => Err(ConfigError::InvalidChoice {
                key: "EVENT_STORE".to_string(),
                value: backend,
                expected: "mongodb, memory".to_string(),
            }),
        }
    }
}

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env()?,
            store: StoreConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }
}
