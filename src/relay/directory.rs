//! Static service → control address lookup.

use reqwest::Url;
use std::collections::BTreeMap;

use super::error::DownstreamError;
use crate::config::RelayConfig;

/// Known services and how to reach their control endpoints.
#[derive(Debug, Clone)]
pub struct ServiceDirectory {
    ports: BTreeMap<String, u16>,
    template: String,
}

impl ServiceDirectory {
    pub fn new(ports: BTreeMap<String, u16>, template: impl Into<String>) -> Self {
        Self {
            ports,
            template: template.into(),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.services.clone(), config.target_template.clone())
    }

    pub fn port_of(&self, service: &str) -> Option<u16> {
        self.ports.get(service).copied()
    }

    pub fn contains(&self, service: &str) -> bool {
        self.ports.contains_key(service)
    }

    /// Base URL for a service, or `None` if the service is unknown.
    pub fn base_url(&self, service: &str) -> Option<String> {
        let port = self.port_of(service)?;
        Some(
            self.template
                .replace("{service}", service)
                .replace("{port}", &port.to_string()),
        )
    }

    /// `{base}/simulate/{mode}`, with `mode` percent-encoded as one path segment.
    pub fn simulate_url(&self, service: &str, mode: &str) -> Option<Result<Url, DownstreamError>> {
        let base = self.base_url(service)?;
        Some(build_simulate_url(&base, mode))
    }
}

fn build_simulate_url(base: &str, mode: &str) -> Result<Url, DownstreamError> {
    let mut url =
        Url::parse(base).map_err(|e| DownstreamError::InvalidTarget(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| DownstreamError::InvalidTarget(base.to_string()))?
        .pop_if_empty()
        .extend(["simulate", mode]);
    Ok(url)
}
