//! Sentinel configuration
//!
//! ## Loading Order
//!
//! 1. `SENTINEL_CONFIG` environment variable (path to TOML file)
//! 2. `sentinel.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded [`SentinelConfig`] is owned by the entry point and handed to the
//! store, relay and router explicitly; there is no global instance.

mod sentinel_config;
pub mod defaults;
pub mod validation;

pub use sentinel_config::*;
