//! Webhook endpoint for the workflow engine

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use tracing::{debug, info, warn};

use crate::api::envelope::{ApiError, WebhookAck};
use crate::store::WebhookUpdate;

use super::DashboardState;

/// POST /api/kestra-webhook - Apply a health/AI update
///
/// The body is read as raw bytes so a missing or unusual `Content-Type`
/// does not matter; only a body that is not a JSON object is rejected.
pub async fn kestra_webhook(
    State(state): State<DashboardState>,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let update = WebhookUpdate::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected malformed webhook");
        e
    })?;

    if update.is_empty() {
        debug!("Webhook carried no recognised fields");
    }
    info!(
        metrics = update.metrics.is_some(),
        ai_report = update.ai_report.is_some(),
        raw_ai = update.raw_analysis.is_some(),
        "Received Kestra update"
    );

    let outcome = state.store.apply_webhook(update);
    debug!(
        snapshot_replaced = outcome.snapshot_replaced,
        severity = ?outcome.severity,
        insight_id = ?outcome.insight_id,
        "Webhook applied"
    );

    Ok(Json(WebhookAck { success: true }))
}
