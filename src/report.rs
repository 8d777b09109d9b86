//! Incident report generation from stored AI insights.
//!
//! Each insight's `analysis` is read as loosely structured JSON. Anything that
//! does not parse is treated as a bare summary so no insight is ever dropped.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::store::{classify_report, ReportSeverity};
use crate::types::InsightEntry;

/// Report file prefix; the full name is `sentinel-report-<unix-millis>.md`.
pub const REPORT_FILE_PREFIX: &str = "sentinel-report-";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("No AI insights found to report")]
    NoInsights,
    #[error("Failed to write report {}: {}", .0.display(), .1)]
    Write(PathBuf, #[source] std::io::Error),
}

/// How an insight is counted in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightClass {
    Critical,
    Degraded,
    Healthy,
    Unknown,
}

impl InsightClass {
    fn from_severity(severity: Option<ReportSeverity>) -> Self {
        match severity {
            Some(ReportSeverity::Critical) => Self::Critical,
            Some(ReportSeverity::Degraded) => Self::Degraded,
            Some(ReportSeverity::Healthy) => Self::Healthy,
            None => Self::Unknown,
        }
    }

    pub fn is_incident(self) -> bool {
        matches!(self, Self::Critical | Self::Degraded)
    }
}

impl std::fmt::Display for InsightClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "CRITICAL"),
            Self::Degraded => write!(f, "DEGRADED"),
            Self::Healthy => write!(f, "HEALTHY"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Fields pulled out of an analysis blob. All optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalysisFields {
    #[serde(default, deserialize_with = "lenient_string")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub root_cause: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recommendation: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub confidence_score: Option<f64>,
}

fn lenient_string<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn lenient_number<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

impl AnalysisFields {
    /// Parse an analysis blob. Non-object input becomes the summary.
    pub fn parse(analysis: &str) -> Self {
        match serde_json::from_str::<Value>(analysis) {
            Ok(v @ Value::Object(_)) => serde_json::from_value(v).unwrap_or_default(),
            _ => Self {
                summary: Some(analysis.to_string()),
                ..Self::default()
            },
        }
    }

    /// Explicit `severity` first, then the keyword classifier over the summary.
    pub fn classify(&self) -> InsightClass {
        if let Some(severity) = &self.severity {
            match severity.trim().to_ascii_lowercase().as_str() {
                "critical" => return InsightClass::Critical,
                "degraded" | "warning" => return InsightClass::Degraded,
                "healthy" | "ok" => return InsightClass::Healthy,
                _ => {}
            }
        }
        InsightClass::from_severity(self.summary.as_deref().and_then(classify_report))
    }
}

/// One insight, parsed and classified.
#[derive(Debug, Clone)]
pub struct ReportItem {
    pub timestamp: DateTime<Utc>,
    pub class: InsightClass,
    pub fields: AnalysisFields,
}

impl ReportItem {
    pub fn from_insight(insight: &InsightEntry) -> Self {
        let fields = AnalysisFields::parse(&insight.analysis);
        Self {
            timestamp: insight.timestamp,
            class: fields.classify(),
            fields,
        }
    }
}

/// Parsed insights in chronological order, ready to render.
#[derive(Debug, Clone)]
pub struct IncidentReport {
    pub generated_at: DateTime<Utc>,
    pub items: Vec<ReportItem>,
}

impl IncidentReport {
    /// Build from insights in any order.
    pub fn from_insights(insights: &[InsightEntry], generated_at: DateTime<Utc>) -> Self {
        let mut items: Vec<ReportItem> = insights.iter().map(ReportItem::from_insight).collect();
        items.sort_by_key(|i| i.timestamp);
        Self { generated_at, items }
    }

    fn count(&self, class: InsightClass) -> usize {
        self.items.iter().filter(|i| i.class == class).count()
    }

    pub fn critical_count(&self) -> usize {
        self.count(InsightClass::Critical)
    }

    pub fn degraded_count(&self) -> usize {
        self.count(InsightClass::Degraded)
    }

    pub fn incidents(&self) -> impl Iterator<Item = &ReportItem> {
        self.items.iter().filter(|i| i.class.is_incident())
    }

    /// Healthy insights that directly follow an incident, paired with it.
    pub fn recoveries(&self) -> Vec<(&ReportItem, &ReportItem)> {
        let mut recoveries = Vec::new();
        let mut open: Option<&ReportItem> = None;
        for item in &self.items {
            if item.class.is_incident() {
                open = Some(item);
            } else if item.class == InsightClass::Healthy {
                if let Some(incident) = open.take() {
                    recoveries.push((incident, item));
                }
            }
        }
        recoveries
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "# Sentinel Incident Report\n");
        let _ = writeln!(md, "Generated: {}\n", self.generated_at.to_rfc3339());

        let _ = writeln!(md, "## Summary\n");
        let _ = writeln!(md, "- **Total Events Analyzed:** {}", self.items.len());
        let _ = writeln!(md, "- **Critical Incidents:** {}", self.critical_count());
        let _ = writeln!(md, "- **Degraded Events:** {}", self.degraded_count());
        let _ = writeln!(md, "- **Healthy Checks:** {}\n", self.count(InsightClass::Healthy));

        let _ = writeln!(md, "## Incidents\n");
        let mut any = false;
        for (n, item) in self.incidents().enumerate() {
            any = true;
            let _ = writeln!(md, "### {}. {} at {}\n", n + 1, item.class, item.timestamp.to_rfc3339());
            write_field(&mut md, "Summary", item.fields.summary.as_deref());
            write_field(&mut md, "Root Cause", item.fields.root_cause.as_deref());
            write_field(&mut md, "Recommendation", item.fields.recommendation.as_deref());
            if let Some(score) = item.fields.confidence_score {
                let _ = writeln!(md, "- **Confidence:** {}", format_confidence(score));
            }
            md.push('\n');
        }
        if !any {
            let _ = writeln!(md, "### No Incidents Detected\n");
            let _ = writeln!(md, "All services have been operating normally.\n");
        }

        let recoveries = self.recoveries();
        if !recoveries.is_empty() {
            let _ = writeln!(md, "## Recovery\n");
            for (incident, recovery) in recoveries {
                let _ = writeln!(
                    md,
                    "- {} incident at {} resolved by {}",
                    incident.class,
                    incident.timestamp.to_rfc3339(),
                    recovery.timestamp.to_rfc3339()
                );
            }
            md.push('\n');
        }

        md
    }
}

fn write_field(md: &mut String, label: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        let _ = writeln!(md, "- **{label}:** {v}");
    }
}

/// Scores in `0..=1` are fractions, anything larger is already a percentage.
fn format_confidence(score: f64) -> String {
    let pct = if score <= 1.0 { score * 100.0 } else { score };
    format!("{pct:.0}%")
}

pub fn report_file_name(at: DateTime<Utc>) -> String {
    format!("{REPORT_FILE_PREFIX}{}.md", at.timestamp_millis())
}

/// Render the insights and write `sentinel-report-<millis>.md` into `dir`.
pub fn write_report(
    dir: &Path,
    insights: &[InsightEntry],
    now: DateTime<Utc>,
) -> Result<PathBuf, ReportError> {
    if insights.is_empty() {
        return Err(ReportError::NoInsights);
    }
    let report = IncidentReport::from_insights(insights, now);
    let path = dir.join(report_file_name(now));
    std::fs::write(&path, report.to_markdown()).map_err(|e| ReportError::Write(path.clone(), e))?;
    Ok(path)
}
