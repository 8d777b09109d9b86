//! Sentinel Configuration - server, retention and relay settings as TOML
//!
//! Each section implements `Default` with the values the relay ships with,
//! so running without a config file behaves exactly like the stock demo.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::defaults;

/// Environment variable pointing at a config file.
pub const CONFIG_ENV_VAR: &str = "SENTINEL_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sentinel.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a relay deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// In-memory log sizes
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Downstream action relay
    #[serde(default)]
    pub relay: RelayConfig,
}

impl SentinelConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SENTINEL_CONFIG`
    /// 2. `./sentinel.toml`
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys only warn.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Check every section, collecting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.server.addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!(
                "server.addr '{}' is not a valid HOST:PORT socket address",
                self.server.addr
            ));
        }

        if self.retention.activity_capacity == 0 {
            errors.push("retention.activity_capacity must be > 0".to_string());
        }
        if self.retention.insight_capacity == 0 {
            errors.push("retention.insight_capacity must be > 0".to_string());
        }

        let r = &self.relay;
        if r.timeout_secs == 0 {
            errors.push("relay.timeout_secs must be > 0".to_string());
        }
        if !(r.target_template.starts_with("http://") || r.target_template.starts_with("https://")) {
            errors.push(format!(
                "relay.target_template '{}' must start with http:// or https://",
                r.target_template
            ));
        }
        if !r.target_template.contains("{service}") && !r.target_template.contains("{port}") {
            errors.push(
                "relay.target_template must contain a {service} or {port} placeholder".to_string(),
            );
        }
        if r.services.is_empty() {
            errors.push("relay.services must list at least one service".to_string());
        }
        for (name, port) in &r.services {
            if *port == 0 {
                errors.push(format!("relay.services.{name}: port must be non-zero"));
            }
            if name.is_empty() || name.contains('/') {
                errors.push(format!("relay.services: invalid service name '{name}'"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Services the snapshot is seeded with and the relay can reach.
    pub fn known_services(&self) -> Vec<String> {
        self.relay.services.keys().cloned().collect()
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `SENTINEL_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Retention
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_activity_capacity")]
    pub activity_capacity: usize,
    #[serde(default = "default_insight_capacity")]
    pub insight_capacity: usize,
}

fn default_activity_capacity() -> usize {
    defaults::ACTIVITY_LOG_CAPACITY
}

fn default_insight_capacity() -> usize {
    defaults::INSIGHT_LOG_CAPACITY
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            activity_capacity: default_activity_capacity(),
            insight_capacity: default_insight_capacity(),
        }
    }
}

// ============================================================================
// Relay
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Bounded wait for each downstream call (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Base URL of a service's control endpoint
    #[serde(default = "default_target_template")]
    pub target_template: String,

    /// Service name → control port
    #[serde(default = "default_services")]
    pub services: BTreeMap<String, u16>,
}

fn default_timeout_secs() -> u64 {
    defaults::ACTION_TIMEOUT_SECS
}

fn default_target_template() -> String {
    defaults::ACTION_TARGET_TEMPLATE.to_string()
}

fn default_services() -> BTreeMap<String, u16> {
    defaults::KNOWN_SERVICES
        .iter()
        .map(|(name, port)| ((*name).to_string(), *port))
        .collect()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            target_template: default_target_template(),
            services: default_services(),
        }
    }
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
