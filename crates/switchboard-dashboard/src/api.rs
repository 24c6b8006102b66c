//! JSON endpoints served next to the dashboard.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use switchboard_core::BackendRecord;

use crate::DashboardState;

/// Last successfully polled backend list, as the proxy API reported it.
pub async fn list_backends(State(state): State<DashboardState>) -> Json<Vec<BackendRecord>> {
    Json(state.view.records().await)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub polls: u64,
    pub consecutive_failures: u32,
}

/// Liveness of the dashboard process itself.
pub async fn healthz(State(state): State<DashboardState>) -> Json<HealthResponse> {
    let snapshot = state.view.snapshot().await;
    Json(HealthResponse {
        status: "ok",
        polls: snapshot.generation,
        consecutive_failures: snapshot.consecutive_failures,
    })
}
