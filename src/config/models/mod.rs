//! Configuration data models
//!
//! This module defines all configuration structures used by the gateway.

#![allow(missing_docs)]

pub mod analytics;
pub mod chat;
pub mod logging;
pub mod rate_limit;
pub mod server;
pub mod storage;

pub use analytics::*;
pub use chat::*;
pub use logging::*;
pub use rate_limit::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    64 * 1024
}

pub fn default_true() -> bool {
    true
}

/// Default capacity of each local counter store
pub fn default_max_entries() -> usize {
    1000
}

pub fn default_connection_timeout_ms() -> u64 {
    2000
}

pub fn default_command_timeout_ms() -> u64 {
    500
}

pub fn default_reconnect_cooldown_secs() -> u64 {
    30
}

pub fn default_key_prefix() -> String {
    "rate_limit:".to_string()
}
