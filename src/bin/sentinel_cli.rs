//! sentinel-cli - terminal client for the Sentinel relay
//!
//! ```bash
//! sentinel-cli status
//! sentinel-cli action payment restart
//! sentinel-cli report --out ./reports
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use sentinel::cli;
use sentinel::client::SentinelClient;
use sentinel::config::defaults;

#[derive(Parser, Debug)]
#[command(name = "sentinel-cli")]
#[command(about = "Query and control a Sentinel relay")]
#[command(version)]
struct CliArgs {
    /// Relay base URL
    #[arg(long, env = "SENTINEL_URL", default_value = defaults::CLI_BACKEND_URL)]
    url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = defaults::CLI_HTTP_TIMEOUT_SECS)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the health of every service
    Status,
    /// Trigger an action on a service (e.g. `restart`, `heal`, `degrade`)
    Action {
        service: String,
        #[arg(value_name = "TYPE")]
        action: String,
    },
    /// Write a Markdown incident report from the stored AI insights
    Report {
        /// Directory to write the report into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let client = SentinelClient::new(&args.url, Duration::from_secs(args.timeout))
        .context("Failed to create client")?;
    let mut stdout = std::io::stdout().lock();

    match args.command {
        Command::Status => {
            cli::show_status(&client, &mut stdout).await?;
        }
        Command::Action { service, action } => {
            cli::run_action(&client, &service, &action, &mut stdout)
                .await
                .with_context(|| format!("Failed to execute {action} on {service}"))?;
        }
        Command::Report { out } => {
            cli::generate_report(&client, &out, &mut stdout)
                .await
                .context("Report generation failed")?;
        }
    }

    Ok(())
}
