//! Relay error types

use std::time::Duration;

/// Why a downstream control call did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum DownstreamError {
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid target url: {0}")]
    InvalidTarget(String),
}

/// Result of a rejected or failed manual action.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Service name not in the directory. Nothing was called or logged.
    #[error("Unknown service '{0}'")]
    UnknownService(String),
    /// The downstream call failed. An alert was logged.
    #[error("Failed to execute {action} on {service}: {source}")]
    Downstream {
        service: String,
        action: String,
        #[source]
        source: DownstreamError,
    },
}
