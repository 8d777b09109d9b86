//! Response bodies shared by the API handlers, and the error → status mapping.
//!
//! Every failure leaves the API as `{ "error": "..." }` with a 4xx/5xx status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::relay::RelayError;
use crate::store::WebhookError;

/// Error body: `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Manual action result: `{ "success": true, "message": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Webhook acknowledgement: `{ "success": true }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub success: bool,
}

/// Anything a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error(transparent)]
    MalformedWebhook(#[from] WebhookError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Relay(RelayError::UnknownService(_)) | Self::MalformedWebhook(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Relay(RelayError::Downstream { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Downstream detail stays in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::Relay(RelayError::UnknownService(_)) => "Unknown service".to_string(),
            Self::Relay(RelayError::Downstream { .. }) => "Action failed".to_string(),
            Self::MalformedWebhook(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.message() })).into_response()
    }
}
