//! Liveness probe reporting the state of the record store

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Courses currently in the catalog
    pub courses: usize,
    /// Simulated delay applied to every store call
    pub store_latency_ms: u128,
}

/// GET /health
///
/// Answers without the simulated store latency.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        courses: state.store.course_count().await,
        store_latency_ms: state.store.latency().as_millis(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
