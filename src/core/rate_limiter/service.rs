//! Per-route rate limit service

use super::backend::{LocalBackend, RateLimitBackend, SharedCacheBackend};
use super::identity::ClientHeaders;
use super::limiter::LocalRateLimiter;
use super::monitor::CacheState;
use super::types::{RateLimitPolicy, RateLimitResult};
use std::sync::Arc;
use tracing::debug;

/// Applies one route's policy, choosing the backend on every call
pub struct RateLimitService {
    scope: &'static str,
    policy: RateLimitPolicy,
    local: LocalBackend,
    shared: Option<SharedCacheBackend>,
}

impl RateLimitService {
    /// Service that only ever counts in process
    pub fn local_only(
        scope: &'static str,
        policy: RateLimitPolicy,
        limiter: Arc<LocalRateLimiter>,
    ) -> Self {
        Self {
            scope,
            policy,
            local: LocalBackend::new(limiter),
            shared: None,
        }
    }

    /// Service that prefers the shared cache while it is available
    pub fn with_shared_cache(
        scope: &'static str,
        policy: RateLimitPolicy,
        limiter: Arc<LocalRateLimiter>,
        shared: SharedCacheBackend,
    ) -> Self {
        Self {
            scope,
            policy,
            local: LocalBackend::new(limiter),
            shared: Some(shared),
        }
    }

    fn select(&self) -> &dyn RateLimitBackend {
        match &self.shared {
            Some(shared) if shared.is_available() => shared,
            _ => &self.local,
        }
    }

    /// Count a request from `headers`
    pub async fn check(&self, headers: &ClientHeaders) -> RateLimitResult {
        let backend = self.select();
        let result = backend.check(headers, &self.policy).await;
        debug!(
            scope = self.scope,
            backend = backend.name(),
            user_id = %result.user_id,
            limited = result.is_limited,
            "Rate limit check"
        );
        result
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Clients tracked by the in-process store
    pub fn local_entries(&self) -> usize {
        self.local.limiter().len()
    }

    /// Shared cache state, if this service uses one
    pub fn shared_state(&self) -> Option<CacheState> {
        self.shared
            .as_ref()
            .map(|shared| shared.limiter().monitor().state())
    }
}
