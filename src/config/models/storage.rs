//! Shared cache configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Redis configuration
///
/// The shared-cache limiter is only enabled when `url` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis URL, e.g. `redis://:password@host:6379/0`
    #[serde(default)]
    pub url: Option<String>,
    /// Connection handshake timeout in milliseconds
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
    /// Per-command timeout in milliseconds
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
    /// How long the cache stays marked unavailable before a request may retry
    #[serde(default = "default_reconnect_cooldown_secs")]
    pub reconnect_cooldown_secs: u64,
    /// Prefix of the per-client counter keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            connection_timeout_ms: default_connection_timeout_ms(),
            command_timeout_ms: default_command_timeout_ms(),
            reconnect_cooldown_secs: default_reconnect_cooldown_secs(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl RedisConfig {
    /// Whether a shared cache endpoint is configured
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn reconnect_cooldown(&self) -> Duration {
        Duration::from_secs(self.reconnect_cooldown_secs)
    }

    /// Forget a URL the client could never use; chat then limits in process
    pub fn discard_invalid_url(&mut self) {
        let Some(url) = self.url.as_deref() else {
            return;
        };
        if let Err(e) = check_url(url) {
            warn!("{}, shared rate limiting disabled", e);
            self.url = None;
        }
    }

    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            check_url(url)?;
        }
        if self.connection_timeout_ms == 0 || self.command_timeout_ms == 0 {
            return Err("Redis timeouts must be greater than 0".to_string());
        }
        if self.key_prefix.is_empty() {
            return Err("Redis key prefix cannot be empty".to_string());
        }
        Ok(())
    }
}

fn check_url(url: &str) -> Result<(), String> {
    let parsed = url::Url::parse(url).map_err(|e| format!("Invalid Redis URL: {}", e))?;
    if !matches!(parsed.scheme(), "redis" | "rediss") {
        return Err(format!("Unsupported Redis scheme: {}", parsed.scheme()));
    }
    Ok(())
}
