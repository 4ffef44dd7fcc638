/// Connector-level failures surfaced while opening or probing a store
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Driver-level MongoDB error
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Connection could not be established (after retries, if any)
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health probe failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

/// Result type alias for connector operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
