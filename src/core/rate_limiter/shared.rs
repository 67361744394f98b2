//! Shared-cache fixed-window limiter
//!
//! Counts live in the external cache so every running instance sees the same
//! window. Two failure modes are handled differently:
//!
//! - a transport error or timeout means the cache is down, so the request is
//!   counted by the in-process limiter instead;
//! - a reply that arrives but cannot be understood is treated as a denial,
//!   because a reachable but misbehaving cache must not turn into unlimited
//!   traffic.

use super::identity::ClientHeaders;
use super::limiter::LocalRateLimiter;
use super::monitor::AvailabilityMonitor;
use super::types::{RateLimitPolicy, RateLimitResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Reply of the atomic increment + TTL round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterReply {
    /// Counter value after the increment and the key's TTL in seconds
    /// (`-1` when the key has no expiry)
    Counted { count: i64, ttl_secs: i64 },
    /// The round trip completed but its result was unusable
    Malformed(String),
}

/// Counter operations the shared-cache limiter needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharedCounterStore: Send + Sync {
    /// Atomically increment `key` and read its remaining TTL
    async fn increment_with_ttl(&self, key: &str) -> Result<CounterReply>;

    /// Set `key` to expire after `seconds`
    async fn expire(&self, key: &str, seconds: u64) -> Result<()>;
}

/// Rate limiter backed by a shared counter store
pub struct SharedCacheLimiter {
    store: Option<Arc<dyn SharedCounterStore>>,
    monitor: Arc<AvailabilityMonitor>,
    fallback: Arc<LocalRateLimiter>,
    key_prefix: String,
}

impl SharedCacheLimiter {
    pub fn new(
        store: Option<Arc<dyn SharedCounterStore>>,
        monitor: Arc<AvailabilityMonitor>,
        fallback: Arc<LocalRateLimiter>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            monitor,
            fallback,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn monitor(&self) -> &Arc<AvailabilityMonitor> {
        &self.monitor
    }

    /// Whether a check would currently reach the shared cache
    pub fn is_available(&self) -> bool {
        self.store.is_some() && self.monitor.is_available()
    }

    pub fn key_for(&self, user_id: &str) -> String {
        format!("{}{}", self.key_prefix, user_id)
    }

    /// Count a request for `user_id` against `policy`; never fails
    pub async fn check_shared(&self, user_id: &str, policy: &RateLimitPolicy) -> RateLimitResult {
        let store = match &self.store {
            Some(store) if self.monitor.is_available() => store,
            _ => return self.fallback(user_id, policy),
        };

        let key = self.key_for(user_id);
        let window_secs = policy.window_secs();

        let (count, ttl_secs) = match store.increment_with_ttl(&key).await {
            Ok(CounterReply::Counted { count, ttl_secs }) => (count, ttl_secs),
            Ok(CounterReply::Malformed(detail)) => {
                error!(
                    key = %key,
                    "Malformed shared cache reply ({}), denying request",
                    detail
                );
                return RateLimitResult::limited(user_id, policy.window_ms());
            }
            Err(e) => {
                warn!("Shared cache rate limit check failed: {}. Falling back to in-process limiter", e);
                return self.fallback(user_id, policy);
            }
        };

        // First hit of a window arms the expiry; a counter that lost its
        // expiry is re-armed so it cannot become permanent.
        if count == 1 || ttl_secs == -1 {
            if let Err(e) = store.expire(&key, window_secs).await {
                warn!("Failed to set expiry on {}: {}. Falling back to in-process limiter", key, e);
                return self.fallback(user_id, policy);
            }
        }

        if count == 1 {
            return RateLimitResult::allowed(user_id);
        }

        if count > i64::from(policy.limit) {
            let time_until_reset_ms = if ttl_secs > 0 {
                ttl_secs as u64 * 1000
            } else {
                policy.window_ms()
            };
            debug!(
                user_id = %user_id,
                count,
                limit = policy.limit,
                "Shared rate limit exceeded"
            );
            return RateLimitResult::limited(user_id, time_until_reset_ms);
        }

        RateLimitResult::allowed(user_id)
    }

    fn fallback(&self, user_id: &str, policy: &RateLimitPolicy) -> RateLimitResult {
        self.fallback
            .check_local(policy, &ClientHeaders::synthetic(user_id))
    }
}
