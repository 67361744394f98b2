//! Configuration management for the gateway
//!
//! Configuration is layered: an optional YAML file, then environment
//! overrides, then bounds for the rate-limit knobs, then validation.

pub mod models;

pub use models::*;

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/folio.yaml";

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Route rate limits
    pub rate_limits: RateLimitSettings,
    /// Shared cache configuration
    pub redis: RedisConfig,
    /// Chat proxy configuration
    pub chat: ChatConfig,
    /// Pageview analytics configuration
    pub analytics: AnalyticsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?;

        debug!("Configuration file parsed successfully");
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok());
        config.finalize()?;
        Ok(config)
    }

    /// Load the file at `path` if it exists, then apply the environment
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await?
        } else {
            info!(
                "Configuration file {:?} not found, using defaults and environment",
                path
            );
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok());
        config.finalize()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("FOLIO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FOLIO_PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("FOLIO_PORT={:?} is not a valid port, ignoring", port),
            }
        }

        // Bounded knobs: parse() never fails, it clamps or falls back.
        let bounded = |bounds: &Bounds| lookup(bounds.name).map(|raw| bounds.parse(Some(&raw)));
        if let Some(v) = bounded(&CHAT_RATE_LIMIT) {
            self.rate_limits.chat_limit = v as u32;
        }
        if let Some(v) = bounded(&CHAT_RATE_WINDOW_MS) {
            self.rate_limits.chat_window_ms = v;
        }
        if let Some(v) = bounded(&CONTACT_RATE_LIMIT) {
            self.rate_limits.contact_limit = v as u32;
        }
        if let Some(v) = bounded(&CONTACT_RATE_WINDOW_MS) {
            self.rate_limits.contact_window_ms = v;
        }
        if let Some(raw) = lookup("RATE_LIMIT_MAX_ENTRIES") {
            match raw.trim().parse::<usize>() {
                Ok(max) if max > 0 => self.rate_limits.max_entries = max,
                _ => warn!(
                    "RATE_LIMIT_MAX_ENTRIES={:?} is invalid, keeping {}",
                    raw, self.rate_limits.max_entries
                ),
            }
        }

        if let Some(url) = lookup("REDIS_URL") {
            self.redis.url = Some(url).filter(|u| !u.trim().is_empty());
        }

        if let Some(key) = lookup("CHAT_API_KEY") {
            self.chat.api_key = Some(key).filter(|k| !k.trim().is_empty());
        }
        if let Some(base) = lookup("CHAT_API_BASE") {
            self.chat.api_base = base;
        }
        if let Some(model) = lookup("CHAT_MODEL") {
            self.chat.model = model;
        }

        if let Some(salt) = lookup("ANALYTICS_SALT") {
            self.analytics.salt = salt;
        }
    }

    /// Clamp bounded settings, drop unusable endpoints, then validate
    pub fn finalize(&mut self) -> Result<()> {
        self.rate_limits.apply_bounds();
        self.redis.discard_invalid_url();
        self.chat.reset_invalid_api_base();
        self.validate()
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| GatewayError::Config(format!("Server config error: {}", e)))?;

        self.rate_limits
            .validate()
            .map_err(|e| GatewayError::Config(format!("Rate limit config error: {}", e)))?;

        self.redis
            .validate()
            .map_err(|e| GatewayError::Config(format!("Redis config error: {}", e)))?;

        self.chat
            .validate()
            .map_err(|e| GatewayError::Config(format!("Chat config error: {}", e)))?;

        if self.analytics.max_events == 0 {
            return Err(GatewayError::Config(
                "Analytics config error: max_events must be greater than 0".to_string(),
            ));
        }

        debug!("Configuration validation completed");
        Ok(())
    }
}
