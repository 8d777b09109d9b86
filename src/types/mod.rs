//! Shared data structures for the Sentinel relay
//!
//! - ServiceHealth / ServiceHealthSnapshot: current per-service status codes
//! - ActivityEntry: human-readable feed lines (info / alert / success)
//! - InsightEntry: opaque AI analysis blobs kept for report generation

mod health;
mod feed;

pub use health::*;
pub use feed::*;
