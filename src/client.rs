//! Sentinel Client - HTTP client for the Ingress API
//!
//! Used by `sentinel-cli` to read the status snapshot and insights and to
//! trigger manual actions.

use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

use crate::api::envelope::{ActionResponse, ErrorBody};
use crate::types::{InsightEntry, ServiceHealthSnapshot};

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid backend url '{0}'")]
    InvalidUrl(String),
    #[error("Server returned status {status}: {message}")]
    ServerError {
        status: reqwest::StatusCode,
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct InsightsBody {
    #[serde(default)]
    insights: Vec<InsightEntry>,
}

/// HTTP client for one relay instance
#[derive(Clone)]
pub struct SentinelClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SentinelClient {
    /// Create a client for `base_url` (e.g. `http://localhost:4000`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// `{base}/api/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    /// GET /api/status
    pub async fn get_status(&self) -> Result<ServiceHealthSnapshot, ClientError> {
        let resp = self
            .http
            .get(self.endpoint(&["status"]))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// GET /api/insights, newest first
    pub async fn get_insights(&self) -> Result<Vec<InsightEntry>, ClientError> {
        let resp = self
            .http
            .get(self.endpoint(&["insights"]))
            .send()
            .await?;
        let body: InsightsBody = check(resp).await?.json().await?;
        Ok(body.insights)
    }

    /// POST /api/action/:service/:type
    pub async fn trigger_action(
        &self,
        service: &str,
        action: &str,
    ) -> Result<ActionResponse, ClientError> {
        let resp = self
            .http
            .post(self.endpoint(&["action", service, action]))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }
}

/// Turn a non-2xx response into [`ClientError::ServerError`], keeping the
/// server's `error` message when it sent one.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    Err(ClientError::ServerError { status, message })
}
