//! Activity feed and AI insight entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of an activity line as shown in the live feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    #[default]
    Info,
    Alert,
    Success,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Info => write!(f, "info"),
            ActivityKind::Alert => write!(f, "alert"),
            ActivityKind::Success => write!(f, "success"),
        }
    }
}

/// One line of the activity feed. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
}

/// Stored AI analysis. `analysis` is opaque to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub analysis: String,
}
