use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::metrics::registry::HttpMetrics;

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub metrics: HttpMetrics,
    pub instance_id: String,
}

/// Health check payload consumed by orchestrators and dashboards.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub hostname: String,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "UP",
        timestamp: Utc::now(),
        hostname: state.instance_id.clone(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: START_TIME.elapsed().as_secs(),
    })
}

/// Liveness probe: answers as long as the process can serve requests.
pub async fn health_live(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "service": "ops-pulse",
        "instance_id": state.instance_id,
    }))
}

/// Readiness probe. This service has no external dependencies to wait on,
/// so readiness reduces to process liveness.
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "service": "ops-pulse",
        "instance_id": state.instance_id,
    }))
}
