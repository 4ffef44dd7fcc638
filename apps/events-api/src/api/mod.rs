//! API routes module
//!
//! Event routes, liveness, readiness and metrics, all mounted at the root.

pub mod events;
pub mod health;

use axum::{Router, routing::get};
use axum_helpers::server::health_router;
use observability::metrics_handler;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .merge(events::router(state))
        .merge(health_router(state.config.app))
        .merge(health::router(state.clone()))
        .route("/metrics", get(metrics_handler))
}
