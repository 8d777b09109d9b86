//! API route handlers
//!
//! - status: health snapshot and liveness
//! - feed: activity and insight logs
//! - action: manual remediation through the relay
//! - webhook: inbound updates from the workflow engine

mod action;
mod feed;
mod status;
mod webhook;

pub use action::*;
pub use feed::*;
pub use status::*;
pub use webhook::*;

use std::sync::Arc;
use std::time::Instant;

use crate::config::SentinelConfig;
use crate::relay::{ActionRelay, ActionTransport, HttpTransport};
use crate::store::Store;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    /// Snapshot, activity feed and insights
    pub store: Arc<Store>,
    /// Manual action relay (writes its outcomes into `store`)
    pub relay: Arc<ActionRelay>,
    /// Process start, for `/health` uptime
    pub started_at: Instant,
}

impl DashboardState {
    pub fn new(store: Arc<Store>, relay: Arc<ActionRelay>) -> Self {
        Self {
            store,
            relay,
            started_at: Instant::now(),
        }
    }

    /// Wire a store and relay from config over the given transport.
    pub fn with_transport(config: &SentinelConfig, transport: Arc<dyn ActionTransport>) -> Self {
        let store = Arc::new(Store::new(config.known_services(), &config.retention));
        let relay = ActionRelay::from_config(&config.relay, transport, Arc::clone(&store));
        Self::new(store, Arc::new(relay))
    }

    /// Wire a store and relay from config using the HTTP transport.
    pub fn from_config(config: &SentinelConfig) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }
}
