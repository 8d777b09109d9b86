//! Manual action endpoint

use axum::extract::{Path, State};
use axum::Json;

use crate::api::envelope::{ActionResponse, ApiError};

use super::DashboardState;

/// POST /api/action/:service/:type - Relay a manual action to a service
///
/// 400 for an unknown service (nothing logged), 500 if the downstream call
/// failed or timed out (an alert is logged).
pub async fn trigger_action(
    State(state): State<DashboardState>,
    Path((service, action_type)): Path<(String, String)>,
) -> Result<Json<ActionResponse>, ApiError> {
    let receipt = state.relay.trigger_action(&service, &action_type).await?;
    Ok(Json(ActionResponse {
        success: true,
        message: receipt.message,
    }))
}
