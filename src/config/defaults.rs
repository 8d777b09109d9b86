//! System-wide default constants.

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address for the relay.
pub const SERVER_ADDR: &str = "0.0.0.0:4000";

// ============================================================================
// Retention
// ============================================================================

/// Activity feed entries kept in memory.
pub const ACTIVITY_LOG_CAPACITY: usize = 50;

/// AI insight entries kept in memory.
pub const INSIGHT_LOG_CAPACITY: usize = 20;

// ============================================================================
// Action Relay
// ============================================================================

/// Bounded wait for a downstream action call (seconds).
pub const ACTION_TIMEOUT_SECS: u64 = 5;

/// Downstream control address. `{service}` and `{port}` are substituted.
pub const ACTION_TARGET_TEMPLATE: &str = "http://{service}-service:{port}";

/// Simulated services and their control ports.
pub const KNOWN_SERVICES: &[(&str, u16)] = &[
    ("auth", 3001),
    ("payment", 3002),
    ("notification", 3003),
];

// ============================================================================
// CLI Client
// ============================================================================

/// Backend URL the CLI talks to when `--url` / `SENTINEL_URL` is unset.
pub const CLI_BACKEND_URL: &str = "http://localhost:4000";

/// HTTP timeout for CLI requests (seconds).
pub const CLI_HTTP_TIMEOUT_SECS: u64 = 10;
