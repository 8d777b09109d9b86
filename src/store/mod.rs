//! In-memory store for service health, the activity feed and AI insights
//!
//! A single [`Store`] owns all three collections. Every read or append is one
//! critical section, so concurrent appends can never interleave their
//! truncation. Nothing here touches the network or the disk.

mod bounded_log;
mod classify;
mod memory;
mod webhook;

pub use bounded_log::BoundedLog;
pub use classify::{classify_report, ReportSeverity};
pub use memory::{Store, WebhookOutcome, HEALTHY_REPORT_MESSAGE};
pub use webhook::{WebhookError, WebhookUpdate};
