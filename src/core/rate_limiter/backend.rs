//! Rate limit backends
//!
//! Route handlers never branch on cache availability themselves; they hold a
//! [`RateLimitService`](super::RateLimitService) which picks one of these
//! backends per call.

use super::identity::{ClientHeaders, derive_client_id};
use super::limiter::LocalRateLimiter;
use super::shared::SharedCacheLimiter;
use super::types::{RateLimitPolicy, RateLimitResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Capability to count a request against a policy
#[async_trait]
pub trait RateLimitBackend: Send + Sync {
    /// Short name used in logs and health output
    fn name(&self) -> &'static str;

    /// Count one request; never fails
    async fn check(&self, headers: &ClientHeaders, policy: &RateLimitPolicy) -> RateLimitResult;
}

/// In-process backend
pub struct LocalBackend {
    limiter: Arc<LocalRateLimiter>,
}

impl LocalBackend {
    pub fn new(limiter: Arc<LocalRateLimiter>) -> Self {
        Self { limiter }
    }

    pub fn limiter(&self) -> &Arc<LocalRateLimiter> {
        &self.limiter
    }
}

#[async_trait]
impl RateLimitBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn check(&self, headers: &ClientHeaders, policy: &RateLimitPolicy) -> RateLimitResult {
        self.limiter.check_local(policy, headers)
    }
}

/// Shared-cache backend with transparent in-process fallback
pub struct SharedCacheBackend {
    limiter: SharedCacheLimiter,
}

impl SharedCacheBackend {
    pub fn new(limiter: SharedCacheLimiter) -> Self {
        Self { limiter }
    }

    pub fn limiter(&self) -> &SharedCacheLimiter {
        &self.limiter
    }

    pub fn is_available(&self) -> bool {
        self.limiter.is_available()
    }
}

#[async_trait]
impl RateLimitBackend for SharedCacheBackend {
    fn name(&self) -> &'static str {
        "shared_cache"
    }

    async fn check(&self, headers: &ClientHeaders, policy: &RateLimitPolicy) -> RateLimitResult {
        let user_id = derive_client_id(headers);
        self.limiter.check_shared(&user_id, policy).await
    }
}
