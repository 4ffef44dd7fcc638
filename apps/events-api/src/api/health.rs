//! Readiness endpoint

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

use crate::state::{AppState, StoreHandle};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when the event store answers, 503 otherwise
async fn readiness_check(State(state): State<AppState>) -> Response {
    let (name, check): (&str, HealthCheckFuture) = match &state.store {
        StoreHandle::MongoDb { client, .. } => (
            "mongodb",
            Box::pin(async move {
                let status = database::mongodb::check_health_detailed(client).await;
                tracing::debug!(response_time_ms = status.response_time_ms, "MongoDB ping");
                if status.healthy {
                    Ok(())
                } else {
                    Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
                }
            }),
        ),
        StoreHandle::Memory => ("memory", Box::pin(async { Ok(()) })),
    };

    run_health_checks(vec![(name, check)]).await
}
