//! Outbound transport for control calls.

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use super::error::DownstreamError;

/// Sends "switch to mode" requests to downstream services.
///
/// The relay applies its own bounded wait around every call, so
/// implementations do not need a timeout of their own.
#[async_trait]
pub trait ActionTransport: Send + Sync {
    async fn request_mode(&self, target: &Url) -> Result<(), DownstreamError>;
}

/// Plain HTTP transport: `POST {target}` with an empty JSON object.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ActionTransport for HttpTransport {
    async fn request_mode(&self, target: &Url) -> Result<(), DownstreamError> {
        let resp = self
            .http
            .post(target.clone())
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = resp.status();
        debug!(%target, %status, "Downstream control call returned");
        if status.is_success() {
            Ok(())
        } else {
            Err(DownstreamError::Status(status))
        }
    }
}
