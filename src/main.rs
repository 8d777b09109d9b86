//! Sentinel - monitoring relay
//!
//! Mirrors service health and AI insights posted by the workflow engine and
//! relays manual remediation actions from the dashboard to the services.
//!
//! # Usage
//!
//! ```bash
//! # Run with built-in defaults (0.0.0.0:4000, auth/payment/notification)
//! cargo run --release
//!
//! # Run with an explicit config file and bind address
//! ./sentinel --config sentinel.toml --addr 127.0.0.1:4000
//! ```
//!
//! # Environment Variables
//!
//! - `SENTINEL_CONFIG`: Path to a TOML config file (default: ./sentinel.toml)
//! - `SENTINEL_SERVER_ADDR`: Bind address, overridden by `--addr`
//! - `SENTINEL_CORS_ORIGINS`: Comma-separated allowed origins (default: any)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use sentinel::api::{create_app, DashboardState};
use sentinel::config::SentinelConfig;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "sentinel")]
#[command(about = "Sentinel monitoring relay")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:4000")
    #[arg(short, long, env = "SENTINEL_SERVER_ADDR")]
    addr: Option<String>,

    /// Config file to load instead of the standard search order
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn load_config(args: &CliArgs) -> Result<SentinelConfig> {
    let mut config = match &args.config {
        Some(path) => SentinelConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SentinelConfig::load(),
    };
    if let Some(addr) = &args.addr {
        config.server.addr = addr.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Spawn the HTTP server task into the JoinSet.
fn spawn_http_server(
    task_set: &mut JoinSet<Result<()>>,
    listener: tokio::net::TcpListener,
    app: axum::Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    info!(
        services = ?config.known_services(),
        activity_capacity = config.retention.activity_capacity,
        insight_capacity = config.retention.insight_capacity,
        timeout_secs = config.relay.timeout_secs,
        "Starting Sentinel relay"
    );

    let state = DashboardState::from_config(&config).context("Failed to build HTTP client")?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.addr))?;
    info!("HTTP server listening on {}", config.server.addr);

    let cancel_token = CancellationToken::new();
    let mut task_set = JoinSet::new();
    spawn_http_server(&mut task_set, listener, app, cancel_token.clone());

    let shutdown = cancel_token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl+C received, shutting down"),
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
        shutdown.cancel();
    });

    while let Some(joined) = task_set.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                cancel_token.cancel();
                return Err(e);
            }
            Err(e) => {
                cancel_token.cancel();
                return Err(anyhow::anyhow!("Task panicked: {}", e));
            }
        }
    }

    info!("Sentinel stopped");
    Ok(())
}
