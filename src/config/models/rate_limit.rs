//! Rate limiting configuration
//!
//! Every numeric knob here is bounded: values that are not numbers fall back
//! to the default, values outside the range are pulled to the nearest bound.
//! Misconfiguration is logged and never stops the service.

use super::*;
use crate::core::rate_limiter::RateLimitPolicy;
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use std::time::Duration;
use tracing::warn;

/// A bounded numeric setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Setting name used in log lines (the environment variable name)
    pub name: &'static str,
    pub default: u64,
    pub min: u64,
    pub max: u64,
}

pub const CHAT_RATE_LIMIT: Bounds = Bounds {
    name: "CHAT_RATE_LIMIT",
    default: 20,
    min: 5,
    max: 100,
};

pub const CHAT_RATE_WINDOW_MS: Bounds = Bounds {
    name: "CHAT_RATE_WINDOW_MS",
    default: 3_600_000,
    min: 60_000,
    max: 86_400_000,
};

pub const CONTACT_RATE_LIMIT: Bounds = Bounds {
    name: "CONTACT_RATE_LIMIT",
    default: 5,
    min: 1,
    max: 20,
};

pub const CONTACT_RATE_WINDOW_MS: Bounds = Bounds {
    name: "CONTACT_RATE_WINDOW_MS",
    default: 3_600_000,
    min: 60_000,
    max: 86_400_000,
};

impl Bounds {
    /// Pull `value` into `[min, max]`
    pub fn clamp(&self, value: u64) -> u64 {
        if value < self.min {
            warn!(
                "{}={} is below the minimum, using {}",
                self.name, value, self.min
            );
            self.min
        } else if value > self.max {
            warn!(
                "{}={} is above the maximum, using {}",
                self.name, value, self.max
            );
            self.max
        } else {
            value
        }
    }

    /// Parse a raw setting; absent means default
    pub fn parse(&self, raw: Option<&str>) -> u64 {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return self.default;
        };

        match raw.parse::<i64>() {
            Ok(value) if value < 0 => self.clamp(0),
            Ok(value) => self.clamp(value as u64),
            // Numeric but too wide for i64: still out of range, not garbage.
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => self.clamp(u64::MAX),
            Err(e) if *e.kind() == IntErrorKind::NegOverflow => self.clamp(0),
            Err(_) => {
                warn!(
                    "{}={:?} is not a number, using default {}",
                    self.name, raw, self.default
                );
                self.default
            }
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Chat requests per window
    #[serde(default = "default_chat_limit")]
    pub chat_limit: u32,
    /// Chat window in milliseconds
    #[serde(default = "default_chat_window_ms")]
    pub chat_window_ms: u64,
    /// Contact form submissions per window
    #[serde(default = "default_contact_limit")]
    pub contact_limit: u32,
    /// Contact window in milliseconds
    #[serde(default = "default_contact_window_ms")]
    pub contact_window_ms: u64,
    /// Capacity of each in-process counter store
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            chat_limit: default_chat_limit(),
            chat_window_ms: default_chat_window_ms(),
            contact_limit: default_contact_limit(),
            contact_window_ms: default_contact_window_ms(),
            max_entries: default_max_entries(),
        }
    }
}

impl RateLimitSettings {
    /// Clamp every bounded value into its allowed range
    pub fn apply_bounds(&mut self) {
        self.chat_limit = CHAT_RATE_LIMIT.clamp(self.chat_limit as u64) as u32;
        self.chat_window_ms = CHAT_RATE_WINDOW_MS.clamp(self.chat_window_ms);
        self.contact_limit = CONTACT_RATE_LIMIT.clamp(self.contact_limit as u64) as u32;
        self.contact_window_ms = CONTACT_RATE_WINDOW_MS.clamp(self.contact_window_ms);
    }

    pub fn chat_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(self.chat_limit, Duration::from_millis(self.chat_window_ms))
    }

    pub fn contact_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(
            self.contact_limit,
            Duration::from_millis(self.contact_window_ms),
        )
    }

    /// Validate rate limit configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries == 0 {
            return Err("rate_limits.max_entries must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_chat_limit() -> u32 {
    CHAT_RATE_LIMIT.default as u32
}

fn default_chat_window_ms() -> u64 {
    CHAT_RATE_WINDOW_MS.default
}

fn default_contact_limit() -> u32 {
    CONTACT_RATE_LIMIT.default as u32
}

fn default_contact_window_ms() -> u64 {
    CONTACT_RATE_WINDOW_MS.default
}
