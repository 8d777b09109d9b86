//! API route definitions
//!
//! - GET  /api/status                   - current service health snapshot
//! - GET  /api/activity                 - activity feed, newest first
//! - GET  /api/insights                 - stored AI analyses, newest first
//! - POST /api/action/:service/:type    - relay a manual action
//! - POST /api/kestra-webhook           - health/AI update from the workflow engine
//! - GET  /health                       - liveness

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, DashboardState};

/// Create all `/api` routes
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/status", get(handlers::get_status))
        .route("/activity", get(handlers::get_activity))
        .route("/insights", get(handlers::get_insights))
        .route("/action/:service/:type", post(handlers::trigger_action))
        .route("/kestra-webhook", post(handlers::kestra_webhook))
        .with_state(state)
}

/// Liveness endpoint at root level
pub fn health_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SentinelConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn create_test_state() -> DashboardState {
        DashboardState::from_config(&SentinelConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_api_routes_reads() {
        for uri in ["/status", "/activity", "/insights"] {
            let app = api_routes(create_test_state());
            let response = app
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        }
    }

    #[tokio::test]
    async fn test_action_requires_post() {
        let app = api_routes(create_test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/action/auth/restart")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = health_routes(create_test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
