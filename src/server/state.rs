//! Application state shared across HTTP handlers
//!
//! This is the composition root: every service a handler needs is built once
//! here and shared through `web::Data`. Nothing is held in globals.

use crate::config::Config;
use crate::core::analytics::PageviewLog;
use crate::core::completion::{CompletionClient, OpenAiCompatibleClient};
use crate::core::projects::ProjectCatalog;
use crate::core::rate_limiter::{
    AvailabilityMonitor, LocalRateLimiter, RateLimitPolicy, RateLimitService, SharedCacheBackend,
    SharedCacheLimiter, SharedCounterStore,
};
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::info;

/// HTTP server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Limits `/chat`, shared-cache backed when Redis is configured
    pub chat_limiter: Arc<RateLimitService>,
    /// Limits `/contact`, always in process
    pub contact_limiter: Arc<RateLimitService>,
    /// Upstream completion client; `None` answers chat with the fallback text
    pub completion: Option<Arc<dyn CompletionClient>>,
    /// Recent pageviews
    pub pageviews: Arc<PageviewLog>,
    /// Project catalog
    pub projects: ProjectCatalog,
    /// Shared cache availability
    pub monitor: Arc<AvailabilityMonitor>,
}

impl AppState {
    /// Build every service from configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let limits = &config.rate_limits;
        let cache_enabled = cfg!(feature = "redis") && config.redis.is_configured();
        let monitor = Arc::new(AvailabilityMonitor::new(
            cache_enabled,
            config.redis.reconnect_cooldown(),
        ));

        // Separate stores so chat and contact counts never mix.
        let chat_local = Arc::new(LocalRateLimiter::new(limits.max_entries));
        let contact_local = Arc::new(LocalRateLimiter::new(limits.max_entries));

        let chat_limiter = match shared_store(&config, monitor.clone())? {
            Some(store) => {
                let shared = SharedCacheLimiter::new(
                    Some(store),
                    monitor.clone(),
                    chat_local.clone(),
                    config.redis.key_prefix.clone(),
                );
                RateLimitService::with_shared_cache(
                    "chat",
                    limits.chat_policy(),
                    chat_local,
                    SharedCacheBackend::new(shared),
                )
            }
            None => RateLimitService::local_only("chat", limits.chat_policy(), chat_local),
        };
        let contact_limiter =
            RateLimitService::local_only("contact", limits.contact_policy(), contact_local);

        let completion = OpenAiCompatibleClient::from_config(&config.chat)?
            .map(|client| Arc::new(client) as Arc<dyn CompletionClient>);
        if completion.is_none() {
            info!("No chat API key configured, chat will answer with the fallback message");
        }

        log_policy("chat", chat_limiter.policy());
        log_policy("contact", contact_limiter.policy());

        Ok(Self {
            pageviews: Arc::new(PageviewLog::from_config(&config.analytics)),
            config: Arc::new(config),
            chat_limiter: Arc::new(chat_limiter),
            contact_limiter: Arc::new(contact_limiter),
            completion,
            projects: ProjectCatalog,
            monitor,
        })
    }

    /// Replace the completion client
    pub fn with_completion(mut self, completion: Option<Arc<dyn CompletionClient>>) -> Self {
        self.completion = completion;
        self
    }
}

fn log_policy(scope: &str, policy: &RateLimitPolicy) {
    info!(
        "{} rate limit: {} requests per {}s",
        scope,
        policy.limit,
        policy.window_secs()
    );
}

#[cfg(feature = "redis")]
fn shared_store(
    config: &Config,
    monitor: Arc<AvailabilityMonitor>,
) -> Result<Option<Arc<dyn SharedCounterStore>>> {
    let pool = crate::storage::redis::RedisPool::new(&config.redis, monitor)?;
    Ok(pool.map(|pool| Arc::new(pool) as Arc<dyn SharedCounterStore>))
}

#[cfg(not(feature = "redis"))]
fn shared_store(
    config: &Config,
    _monitor: Arc<AvailabilityMonitor>,
) -> Result<Option<Arc<dyn SharedCounterStore>>> {
    if config.redis.is_configured() {
        tracing::warn!("REDIS_URL is set but the redis feature is disabled, limiting in process");
    }
    Ok(None)
}
