//! REST API module using Axum
//!
//! Ingress API polled by the dashboard front end and `sentinel-cli`:
//! - read endpoints for the status snapshot, activity feed and insights
//! - manual action endpoint forwarding to the [`crate::relay::ActionRelay`]
//! - the webhook the workflow engine posts health updates to

pub mod envelope;
pub mod handlers;
mod routes;

pub use envelope::ApiError;
pub use handlers::DashboardState;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Environment variable with a comma-separated list of allowed origins.
pub const CORS_ORIGINS_ENV_VAR: &str = "SENTINEL_CORS_ORIGINS";

/// Build the CORS layer.
///
/// The dashboard is served from its own origin, so any origin is allowed
/// unless `SENTINEL_CORS_ORIGINS` narrows it down.
fn build_cors_layer() -> CorsLayer {
    match std::env::var(CORS_ORIGINS_ENV_VAR) {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
        Err(_) => CorsLayer::permissive(),
    }
}

/// Create the complete application router.
pub fn create_app(state: DashboardState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes(state.clone()))
        .merge(routes::health_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
