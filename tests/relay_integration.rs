//! Relay and client integration tests over real sockets.
//!
//! Downstream services are throwaway axum servers bound to `127.0.0.1:0`; the
//! relay reaches them through the `http://127.0.0.1:{port}` target template.

use sentinel::api::{create_app, DashboardState};
use sentinel::cli;
use sentinel::client::{ClientError, SentinelClient};
use sentinel::config::{RetentionConfig, SentinelConfig};
use sentinel::relay::{ActionRelay, DownstreamError, HttpTransport, RelayError, ServiceDirectory};
use sentinel::store::Store;
use sentinel::types::ActivityKind;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Seen = Arc<Mutex<Vec<(String, Value)>>>;

/// Fake service control endpoint: records `(mode, body)` and answers `status`.
async fn spawn_service(status: StatusCode, delay: Duration) -> (SocketAddr, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/simulate/:mode",
            post(
                move |State(seen): State<Seen>, Path(mode): Path<String>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push((mode, body));
                    tokio::time::sleep(delay).await;
                    status
                },
            ),
        )
        .with_state(Arc::clone(&seen));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

/// Serve the full relay on an ephemeral port.
async fn spawn_relay(config: SentinelConfig) -> (SocketAddr, DashboardState) {
    let state = DashboardState::from_config(&config).unwrap();
    let app = create_app(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

fn relay_for(addr: SocketAddr, timeout: Duration) -> (ActionRelay, Arc<Store>) {
    let ports: BTreeMap<String, u16> = [("auth".to_string(), addr.port())].into_iter().collect();
    let store = Arc::new(Store::new(["auth"], &RetentionConfig::default()));
    let relay = ActionRelay::new(
        ServiceDirectory::new(ports, "http://127.0.0.1:{port}"),
        Arc::new(HttpTransport::new().unwrap()),
        Arc::clone(&store),
        timeout,
    );
    (relay, store)
}

fn config_for(service_port: u16) -> SentinelConfig {
    let mut config = SentinelConfig::default();
    config.relay.target_template = "http://127.0.0.1:{port}".to_string();
    config.relay.services = [("auth".to_string(), service_port)].into_iter().collect();
    config
}

#[tokio::test]
async fn test_http_transport_posts_empty_object_to_simulate() {
    let (addr, seen) = spawn_service(StatusCode::OK, Duration::ZERO).await;
    let (relay, store) = relay_for(addr, Duration::from_secs(5));

    let receipt = relay.trigger_action("auth", "heal").await.unwrap();
    assert_eq!(receipt.message, "Executed heal on auth");

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "healthy");
    assert_eq!(seen[0].1, serde_json::json!({}));

    let activity = store.activity();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].kind, ActivityKind::Success);
}

#[tokio::test]
async fn test_non_2xx_downstream_is_failure() {
    let (addr, _seen) = spawn_service(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await;
    let (relay, store) = relay_for(addr, Duration::from_secs(5));

    let err = relay.trigger_action("auth", "degrade").await.unwrap_err();
    assert!(matches!(
        err,
        RelayError::Downstream { source: DownstreamError::Status(s), .. } if s == StatusCode::INTERNAL_SERVER_ERROR
    ));
    assert_eq!(store.activity()[0].kind, ActivityKind::Alert);
}

#[tokio::test]
async fn test_slow_downstream_times_out_with_one_alert() {
    let (addr, _seen) = spawn_service(StatusCode::OK, Duration::from_secs(10)).await;
    let (relay, store) = relay_for(addr, Duration::from_millis(200));

    let err = relay.trigger_action("auth", "restart").await.unwrap_err();
    assert!(matches!(
        err,
        RelayError::Downstream { source: DownstreamError::Timeout(_), .. }
    ));

    let activity = store.activity();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].kind, ActivityKind::Alert);
    assert!(activity[0].message.contains("auth"));
    assert!(activity[0].message.contains("restart"));
}

#[tokio::test]
async fn test_unreachable_downstream_is_failure() {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (relay, store) = relay_for(addr, Duration::from_secs(5));
    let err = relay.trigger_action("auth", "restart").await.unwrap_err();
    assert!(matches!(err, RelayError::Downstream { .. }));
    assert_eq!(store.activity()[0].message, "Failed to execute restart on auth");
}

#[tokio::test]
async fn test_client_round_trip_through_relay() {
    let (service_addr, seen) = spawn_service(StatusCode::OK, Duration::ZERO).await;
    let (relay_addr, state) = spawn_relay(config_for(service_addr.port())).await;
    let client = SentinelClient::new(&format!("http://{relay_addr}"), Duration::from_secs(5)).unwrap();

    let status = client.get_status().await.unwrap();
    assert_eq!(status.code_of("auth"), Some(0));

    let resp = client.trigger_action("auth", "restart").await.unwrap();
    assert!(resp.success);
    assert_eq!(resp.message, "Executed restart on auth");
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(state.store.activity().len(), 1);

    let err = client.trigger_action("billing", "restart").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ServerError { status, ref message } if status == StatusCode::BAD_REQUEST && message == "Unknown service"
    ));
}

#[tokio::test]
async fn test_cli_report_from_live_relay() {
    let (relay_addr, state) = spawn_relay(SentinelConfig::default()).await;
    let client = SentinelClient::new(&format!("http://{relay_addr}"), Duration::from_secs(5)).unwrap();
    let dir = tempfile::tempdir().unwrap();

    // Nothing stored yet: no file
    let mut out = Vec::new();
    let written = cli::generate_report(&client, dir.path(), &mut out).await.unwrap();
    assert!(written.is_none());
    assert!(String::from_utf8_lossy(&out).contains("No AI insights found to report"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    state.store.apply_webhook(sentinel::WebhookUpdate {
        raw_analysis: Some(r#"{"severity":"critical","summary":"payment CRITICAL"}"#.to_string()),
        ..Default::default()
    });
    state.store.apply_webhook(sentinel::WebhookUpdate {
        raw_analysis: Some(r#"{"severity":"healthy","summary":"All systems HEALTHY"}"#.to_string()),
        ..Default::default()
    });

    let mut out = Vec::new();
    let path = cli::generate_report(&client, dir.path(), &mut out)
        .await
        .unwrap()
        .unwrap();
    let output = String::from_utf8_lossy(&out);
    assert!(output.contains("Generating Incident Report"));
    assert!(output.contains("Report saved to"));

    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("sentinel-report-") && name.ends_with(".md"));
    let md = std::fs::read_to_string(&path).unwrap();
    assert!(md.contains("Sentinel Incident Report"));
    assert!(md.contains("CRITICAL"));
    assert!(md.contains("Recovery"));
}

#[tokio::test]
async fn test_cli_status_from_live_relay() {
    let (relay_addr, state) = spawn_relay(SentinelConfig::default()).await;
    state.store.apply_webhook(sentinel::WebhookUpdate {
        metrics: Some(
            [
                ("auth".to_string(), sentinel::ServiceHealth::new(200)),
                ("payment".to_string(), sentinel::ServiceHealth::new(500)),
            ]
            .into_iter()
            .collect(),
        ),
        ..Default::default()
    });

    let client = SentinelClient::new(&format!("http://{relay_addr}"), Duration::from_secs(5)).unwrap();
    let mut out = Vec::new();
    assert!(cli::show_status(&client, &mut out).await.unwrap());

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("AUTH"));
    assert!(text.contains("HEALTHY"));
    assert!(text.contains("PAYMENT"));
    assert!(text.contains("CRITICAL"));
    assert!(!text.contains("NOTIFICATION"));
}
