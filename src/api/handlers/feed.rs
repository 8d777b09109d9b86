//! Feed endpoints: activity log and AI insights

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::{ActivityEntry, InsightEntry};

use super::DashboardState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityResponse {
    pub activity: Vec<ActivityEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub insights: Vec<InsightEntry>,
}

/// GET /api/activity - Activity feed, newest first
pub async fn get_activity(State(state): State<DashboardState>) -> Json<ActivityResponse> {
    Json(ActivityResponse {
        activity: state.store.activity(),
    })
}

/// GET /api/insights - Stored AI analyses, newest first
pub async fn get_insights(State(state): State<DashboardState>) -> Json<InsightsResponse> {
    Json(InsightsResponse {
        insights: state.store.insights(),
    })
}
