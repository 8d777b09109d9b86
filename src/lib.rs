//! Sentinel: monitoring relay for a demo microservice fleet
//!
//! ## Architecture
//!
//! - **Store**: current health snapshot plus bounded activity and insight logs
//! - **Action Relay**: dashboard button → downstream `simulate` call, outcome logged
//! - **Ingress API**: REST endpoints for the dashboard and the workflow webhook
//! - **CLI**: status table, manual actions and Markdown incident reports

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod relay;
pub mod report;
pub mod store;
pub mod types;

// Re-export configuration
pub use config::SentinelConfig;

// Re-export commonly used types
pub use types::{
    ActivityEntry, ActivityKind, InsightEntry, ServiceHealth, ServiceHealthSnapshot,
};

// Re-export core components
pub use relay::{ActionRelay, RelayError};
pub use store::{Store, WebhookUpdate};
