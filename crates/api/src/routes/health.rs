use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use timekeeper_core::store::Stores;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable. Always `true` for the in-memory store.
    pub db_healthy: bool,
}

/// GET /health -- returns service and database health.
async fn health_check<S: Stores>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    let db_healthy = match &state.pool {
        Some(pool) => timekeeper_db::health_check(pool).await.is_ok(),
        None => true,
    };

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router<S: Stores>() -> Router<AppState<S>> {
    Router::new().route("/health", get(health_check::<S>))
}
