use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::api::handlers::AppState;

/// Middleware to track HTTP request metrics.
///
/// Wraps the rest of the stack, times the request, and records a counter
/// increment and a latency observation labeled by (method, status, path)
/// once the downstream handler has produced its response. The response is
/// returned untouched; the status recorded is read from the same value the
/// transport will serialize.
pub async fn track_metrics(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    // Label with the registered route template where one matched. Raw paths
    // can carry request-scoped identifiers (/users/123) and would grow the
    // label space without bound. Unmatched requests have no template and
    // fall back to the raw path, which keeps 404s visible per-path.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    // Process the request
    let response = next.run(req).await;

    // Record metrics
    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();
    state
        .metrics
        .record_request(&method, &status, &path, duration);

    response
}
