//! Rate limiting integration tests
//!
//! Exercises the local limiter, the shared-cache limiter and the per-route
//! service together, using an in-memory counter store in place of Redis.

#[cfg(test)]
mod tests {
    use crate::common::{HeaderFactory, RequestFactory};
    use async_trait::async_trait;
    use folio_gateway::core::rate_limiter::{
        AvailabilityMonitor, CacheState, CounterReply, LocalRateLimiter, ManualClock,
        RateLimitService, SharedCacheBackend, SharedCacheLimiter, SharedCounterStore,
        derive_client_id,
    };
    use folio_gateway::utils::error::{GatewayError, Result};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    /// Counter store shared by several "instances"; no TTL countdown
    #[derive(Default)]
    struct InMemoryCounters {
        counters: Mutex<HashMap<String, (i64, i64)>>,
        offline: AtomicBool,
    }

    #[async_trait]
    impl SharedCounterStore for InMemoryCounters {
        async fn increment_with_ttl(&self, key: &str) -> Result<CounterReply> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(GatewayError::cache("connection refused"));
            }
            let mut counters = self.counters.lock();
            let entry = counters.entry(key.to_string()).or_insert((0, -1));
            entry.0 += 1;
            Ok(CounterReply::Counted {
                count: entry.0,
                ttl_secs: entry.1,
            })
        }

        async fn expire(&self, key: &str, seconds: u64) -> Result<()> {
            if let Some(entry) = self.counters.lock().get_mut(key) {
                entry.1 = seconds as i64;
            }
            Ok(())
        }
    }

    fn shared_service(
        store: Arc<InMemoryCounters>,
        monitor: Arc<AvailabilityMonitor>,
        limit: u32,
    ) -> RateLimitService {
        let local = Arc::new(LocalRateLimiter::new(1000));
        let shared = SharedCacheLimiter::new(
            Some(store as Arc<dyn SharedCounterStore>),
            monitor,
            local.clone(),
            "rate_limit:",
        );
        RateLimitService::with_shared_cache(
            "chat",
            RequestFactory::policy(limit, 60_000),
            local,
            SharedCacheBackend::new(shared),
        )
    }

    #[test]
    fn test_fourth_request_in_window_is_limited() {
        let limiter = LocalRateLimiter::new(1000);
        let policy = RequestFactory::policy(3, 60_000);
        let headers = HeaderFactory::browser("192.0.2.1");

        for _ in 0..3 {
            assert!(!limiter.check_local(&policy, &headers).is_limited);
        }
        let result = limiter.check_local(&policy, &headers);
        assert!(result.is_limited);
        let wait = result.time_until_reset_ms.unwrap();
        assert!(wait > 0 && wait <= 60_000);
    }

    #[test]
    fn test_cleanup_drops_expired_entries() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let limiter = LocalRateLimiter::with_clock(1000, clock.clone());

        limiter.check_local(
            &RequestFactory::policy(5, 1_000),
            &HeaderFactory::browser("192.0.2.1"),
        );
        limiter.check_local(
            &RequestFactory::policy(5, 60_000),
            &HeaderFactory::browser("192.0.2.2"),
        );
        assert_eq!(limiter.len(), 2);

        clock.advance(Duration::from_millis(2_000));
        assert_eq!(limiter.cleanup(), 1);
        assert_eq!(limiter.len(), 1);
        assert!(
            limiter
                .entry(&derive_client_id(&HeaderFactory::browser("192.0.2.2")))
                .is_some()
        );
    }

    #[test]
    fn test_identity_is_stable_per_header_pair() {
        let a = derive_client_id(&HeaderFactory::browser("1.2.3.4"));
        assert_eq!(a, derive_client_id(&HeaderFactory::browser("1.2.3.4")));
        assert_ne!(a, derive_client_id(&HeaderFactory::browser("1.2.3.5")));
        assert!(derive_client_id(&HeaderFactory::anonymous()).starts_with("user_"));
    }

    #[test]
    fn test_store_never_exceeds_capacity() {
        let limiter = LocalRateLimiter::new(50);
        let policy = RequestFactory::policy(5, 3_600_000);
        for i in 0..500 {
            limiter.check_local(&policy, &HeaderFactory::browser(&format!("10.1.{}.{}", i / 256, i % 256)));
        }
        assert!(limiter.len() <= 50);
    }

    #[tokio::test]
    async fn test_unavailable_cache_behaves_like_local() {
        let local = Arc::new(LocalRateLimiter::new(1000));
        let shared = SharedCacheLimiter::new(
            None,
            Arc::new(AvailabilityMonitor::disabled()),
            local.clone(),
            "rate_limit:",
        );
        let policy = RequestFactory::policy(5, 60_000);

        for _ in 0..5 {
            assert!(!shared.check_shared("user_abc", &policy).await.is_limited);
        }
        let sixth = shared.check_shared("user_abc", &policy).await;
        assert!(sixth.is_limited);
        assert!(sixth.time_until_reset_ms.unwrap() <= 60_000);
    }

    #[tokio::test]
    async fn test_instances_share_one_window() {
        let store = Arc::new(InMemoryCounters::default());
        let monitor = Arc::new(AvailabilityMonitor::new(true, Duration::from_secs(30)));
        let instance_a = shared_service(store.clone(), monitor.clone(), 5);
        let instance_b = shared_service(store.clone(), monitor.clone(), 5);
        let headers = HeaderFactory::browser("198.51.100.20");

        for i in 0..5 {
            let instance = if i % 2 == 0 { &instance_a } else { &instance_b };
            assert!(!instance.check(&headers).await.is_limited);
        }

        let result = instance_b.check(&headers).await;
        assert!(result.is_limited);
        assert_eq!(result.time_until_reset_ms, Some(60_000));
        assert_eq!(instance_a.local_entries(), 0);
        assert_eq!(instance_b.local_entries(), 0);
    }

    #[tokio::test]
    async fn test_cache_outage_falls_back_to_local() {
        let store = Arc::new(InMemoryCounters::default());
        let monitor = Arc::new(AvailabilityMonitor::new(true, Duration::from_secs(30)));
        let service = shared_service(store.clone(), monitor.clone(), 5);
        let headers = HeaderFactory::browser("198.51.100.21");

        assert!(!service.check(&headers).await.is_limited);

        store.offline.store(true, Ordering::SeqCst);
        for _ in 0..5 {
            assert!(!service.check(&headers).await.is_limited);
        }
        // Counted locally from scratch, so the sixth fallback request is limited.
        assert!(service.check(&headers).await.is_limited);
        assert_eq!(service.local_entries(), 1);

        // The pool, not the limiter, reports outages to the monitor.
        monitor.on_error("connection refused");
        assert_eq!(service.shared_state(), Some(CacheState::Unavailable));
    }
}
