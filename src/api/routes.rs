use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health, health_live, health_ready, AppState};
use super::middleware::logging_middleware;
use crate::metrics;
use crate::metrics::middleware::track_metrics;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(health))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // Add middleware (order matters: logging -> metrics -> trace)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            track_metrics,
        ))
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
