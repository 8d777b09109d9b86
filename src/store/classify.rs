//! Severity classification of free-text AI reports.
//!
//! This is a keyword heuristic over the narrative text, not a structured
//! severity field. A report that merely mentions "not CRITICAL" still reads
//! as critical.

use crate::types::ActivityKind;

/// Severity keyword found in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportSeverity {
    Healthy,
    Degraded,
    Critical,
}

impl ReportSeverity {
    /// Critical and degraded reports surface as alerts, healthy ones as success.
    pub fn activity_kind(self) -> ActivityKind {
        match self {
            ReportSeverity::Critical | ReportSeverity::Degraded => ActivityKind::Alert,
            ReportSeverity::Healthy => ActivityKind::Success,
        }
    }

    pub fn is_incident(self) -> bool {
        matches!(self, ReportSeverity::Critical | ReportSeverity::Degraded)
    }
}

/// Classify report text by case-sensitive substring match.
///
/// `CRITICAL` wins over `DEGRADED`, and either wins over `HEALTHY`.
pub fn classify_report(text: &str) -> Option<ReportSeverity> {
    if text.contains("CRITICAL") {
        Some(ReportSeverity::Critical)
    } else if text.contains("DEGRADED") {
        Some(ReportSeverity::Degraded)
    } else if text.contains("HEALTHY") {
        Some(ReportSeverity::Healthy)
    } else {
        None
    }
}
