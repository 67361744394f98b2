//! Rate limiter types and data structures

use serde::Serialize;
use std::time::Duration;

/// One client's current counting window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    /// Requests admitted in the current window, always >= 1
    pub count: u32,
    /// Epoch milliseconds at which the window expires
    pub reset_at: u64,
    /// Epoch milliseconds of the latest request, used for eviction only
    pub last_accessed: u64,
}

impl RateLimitEntry {
    /// Entry for the first request of a fresh window
    pub fn fresh(now: u64, window_ms: u64) -> Self {
        Self {
            count: 1,
            reset_at: now.saturating_add(window_ms),
            last_accessed: now,
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.reset_at < now
    }
}

/// Outcome of a single rate limit check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitResult {
    /// Whether the caller must be turned away
    pub is_limited: bool,
    /// Milliseconds until the window resets (only set when limited)
    #[serde(rename = "timeUntilReset", skip_serializing_if = "Option::is_none")]
    pub time_until_reset_ms: Option<u64>,
    /// Pseudonymous id the decision was made for
    pub user_id: String,
}

impl RateLimitResult {
    pub fn allowed(user_id: impl Into<String>) -> Self {
        Self {
            is_limited: false,
            time_until_reset_ms: None,
            user_id: user_id.into(),
        }
    }

    pub fn limited(user_id: impl Into<String>, time_until_reset_ms: u64) -> Self {
        Self {
            is_limited: true,
            time_until_reset_ms: Some(time_until_reset_ms),
            user_id: user_id.into(),
        }
    }

    /// Whole seconds to wait, rounded up, at least 1 when limited
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.time_until_reset_ms
            .map(|ms| ms.div_ceil(1000).max(1))
    }

    /// Whole minutes to wait, rounded up, at least 1 when limited
    pub fn retry_after_minutes(&self) -> Option<u64> {
        self.time_until_reset_ms
            .map(|ms| ms.div_ceil(60_000).max(1))
    }
}

/// Limit and window a route enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Requests admitted per window
    pub limit: u32,
    /// Window length
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }

    pub fn window_ms(&self) -> u64 {
        self.window.as_millis().min(u64::MAX as u128) as u64
    }

    /// Window in whole seconds for key expiry, rounded up, at least 1
    pub fn window_secs(&self) -> u64 {
        self.window_ms().div_ceil(1000).max(1)
    }
}
