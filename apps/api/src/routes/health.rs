//! Health check HTTP route handlers
//!
//! - `GET /health` - Simple liveness check (returns 200 OK)
//! - `GET /health/live` - Kubernetes-style liveness probe
//! - `GET /health/ready` - Readiness plus basic session stats

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

use crate::session::SessionCoordinator;

/// Shared state for health check handlers
#[derive(Clone)]
pub struct HealthState {
    pub coordinator: Arc<SessionCoordinator>,
}

impl HealthState {
    pub fn new(coordinator: Arc<SessionCoordinator>) -> Self {
        Self { coordinator }
    }
}

/// Create the health check router
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(simple_health))
        .route("/live", get(liveness_probe))
        .route("/ready", get(readiness_probe))
        .with_state(state)
}

/// Simple health check for load balancers
async fn simple_health() -> &'static str {
    "OK"
}

/// Liveness probe: the process is running and serving requests
async fn liveness_probe() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe with session stats.
///
/// The session holds no external dependencies, so readiness is always OK;
/// the stats give operators a cheap view of the live session.
async fn readiness_probe(State(state): State<HealthState>) -> impl IntoResponse {
    let queue_length = state.coordinator.list().await.len();
    let master_claimed = state.coordinator.master_holder().await.is_some();

    Json(serde_json::json!({
        "status": "ready",
        "connections": state.coordinator.connections().len(),
        "queueLength": queue_length,
        "masterClaimed": master_claimed,
    }))
}
