//! Command implementations for `sentinel-cli`.
//!
//! Output goes to any `io::Write` so the commands can be exercised in tests.

use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::client::{ClientError, SentinelClient};
use crate::report::{write_report, ReportError};
use crate::types::ServiceHealthSnapshot;

/// Message shown when the status call fails for any reason.
pub const BACKEND_UNREACHABLE: &str = "Could not connect to Sentinel Backend";

/// Label for an HTTP-style status code.
pub fn status_label(code: i64) -> &'static str {
    match code {
        200 => "HEALTHY",
        0 => "UNKNOWN",
        c if c >= 500 => "CRITICAL",
        _ => "DEGRADED",
    }
}

/// Status table as plain text.
pub fn render_status(snapshot: &ServiceHealthSnapshot) -> String {
    let mut out = String::from("Sentinel System Status\n\n");
    out.push_str(&format!("{:<16} {:>6}  {}\n", "SERVICE", "CODE", "STATE"));
    for (name, health) in &snapshot.services {
        out.push_str(&format!(
            "{:<16} {:>6}  {}\n",
            name.to_uppercase(),
            health.code,
            status_label(health.code)
        ));
    }
    out.push_str(&format!("\nLast Updated: {}\n", snapshot.last_updated.to_rfc3339()));
    out
}

/// `status`: print the table, or [`BACKEND_UNREACHABLE`] if the call failed.
pub async fn show_status(client: &SentinelClient, out: &mut impl Write) -> std::io::Result<bool> {
    match client.get_status().await {
        Ok(snapshot) => {
            write!(out, "{}", render_status(&snapshot))?;
            Ok(true)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Status request failed");
            writeln!(out, "{BACKEND_UNREACHABLE}")?;
            Ok(false)
        }
    }
}

/// Failure of the `action` or `report` command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// `action`: trigger and print the relay's message.
pub async fn run_action(
    client: &SentinelClient,
    service: &str,
    action: &str,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    writeln!(out, "Triggering {action} on {service}...")?;
    let resp = client.trigger_action(service, action).await?;
    writeln!(out, "{}", resp.message)?;
    Ok(())
}

/// `report`: fetch insights and write a Markdown report into `dir`.
///
/// No insights is not an error; nothing is written.
pub async fn generate_report(
    client: &SentinelClient,
    dir: &Path,
    out: &mut impl Write,
) -> Result<Option<PathBuf>, CommandError> {
    writeln!(out, "Generating Incident Report...")?;
    let insights = client.get_insights().await?;
    match write_report(dir, &insights, Utc::now()) {
        Ok(path) => {
            writeln!(out, "Report saved to {}", path.display())?;
            Ok(Some(path))
        }
        Err(ReportError::NoInsights) => {
            writeln!(out, "{}", ReportError::NoInsights)?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
