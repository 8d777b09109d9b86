//! Status endpoints: service health snapshot and liveness

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ServiceHealthSnapshot;

use super::DashboardState;

/// GET /api/status - Current health snapshot
///
/// Always answers; before the first webhook every known service reports code 0.
pub async fn get_status(State(state): State<DashboardState>) -> Json<ServiceHealthSnapshot> {
    Json(state.store.snapshot())
}

/// Liveness response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /health - Liveness check
pub async fn health_check(State(state): State<DashboardState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
