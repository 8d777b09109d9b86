//! ActionRelay: resolve, call downstream, log the outcome.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::directory::ServiceDirectory;
use super::error::{DownstreamError, RelayError};
use super::transport::ActionTransport;
use crate::config::RelayConfig;
use crate::store::Store;
use crate::types::ActivityKind;

/// Mode a service is asked to switch to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionMode {
    Healthy,
    /// Any other requested mode, passed through verbatim (e.g. `degrade`).
    Other(String),
}

impl ActionMode {
    /// `restart` and `heal` both mean "become healthy".
    pub fn from_action(action: &str) -> Self {
        match action {
            "restart" | "heal" => ActionMode::Healthy,
            other => ActionMode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActionMode::Healthy => "healthy",
            ActionMode::Other(mode) => mode,
        }
    }
}

/// Successful manual action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReceipt {
    pub service: String,
    pub action: String,
    pub mode: ActionMode,
    pub message: String,
}

/// Turns dashboard actions into downstream control calls.
#[derive(Clone)]
pub struct ActionRelay {
    directory: ServiceDirectory,
    transport: Arc<dyn ActionTransport>,
    store: Arc<Store>,
    timeout: Duration,
}

impl ActionRelay {
    pub fn new(
        directory: ServiceDirectory,
        transport: Arc<dyn ActionTransport>,
        store: Arc<Store>,
        timeout: Duration,
    ) -> Self {
        Self {
            directory,
            transport,
            store,
            timeout,
        }
    }

    pub fn from_config(
        config: &RelayConfig,
        transport: Arc<dyn ActionTransport>,
        store: Arc<Store>,
    ) -> Self {
        Self::new(
            ServiceDirectory::from_config(config),
            transport,
            store,
            config.timeout(),
        )
    }

    /// Ask `service` to perform `action`.
    ///
    /// Unknown services fail fast without any call or log entry. Otherwise the
    /// outcome is logged as a `success` or `alert` activity once the call has
    /// resolved or the bounded wait has elapsed. Nothing is retried.
    pub async fn trigger_action(
        &self,
        service: &str,
        action: &str,
    ) -> Result<ActionReceipt, RelayError> {
        if !self.directory.contains(service) {
            warn!(service = %service, action = %action, "Rejected action for unknown service");
            return Err(RelayError::UnknownService(service.to_string()));
        }

        let mode = ActionMode::from_action(action);
        info!(service = %service, action = %action, mode = mode.as_str(), "Relaying manual action");

        match self.call_downstream(service, &mode).await {
            Ok(()) => {
                self.store.record_activity(
                    format!("Manual Action: Triggered {action} on {service}"),
                    ActivityKind::Success,
                );
                info!(service = %service, action = %action, "Manual action succeeded");
                Ok(ActionReceipt {
                    service: service.to_string(),
                    action: action.to_string(),
                    mode,
                    message: format!("Executed {action} on {service}"),
                })
            }
            Err(source) => {
                self.store.record_activity(
                    format!("Failed to execute {action} on {service}"),
                    ActivityKind::Alert,
                );
                warn!(service = %service, action = %action, error = %source, "Manual action failed");
                Err(RelayError::Downstream {
                    service: service.to_string(),
                    action: action.to_string(),
                    source,
                })
            }
        }
    }

    async fn call_downstream(&self, service: &str, mode: &ActionMode) -> Result<(), DownstreamError> {
        let target = self
            .directory
            .simulate_url(service, mode.as_str())
            .ok_or_else(|| DownstreamError::InvalidTarget(service.to_string()))??;

        tokio::time::timeout(self.timeout, self.transport.request_mode(&target))
            .await
            .map_err(|_| DownstreamError::Timeout(self.timeout))?
    }
}
