//! Fixed-window limiter over the in-process counter store

use super::clock::{Clock, SystemClock};
use super::identity::{ClientHeaders, derive_client_id};
use super::store::CounterStore;
use super::types::{RateLimitEntry, RateLimitPolicy, RateLimitResult};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// In-process fixed-window rate limiter
///
/// Every check runs cleanup and the read-modify-write of the caller's entry
/// under one lock acquisition, so concurrent workers cannot interleave
/// between reading a count and writing it back.
#[derive(Debug)]
pub struct LocalRateLimiter {
    store: Mutex<CounterStore>,
    clock: Arc<dyn Clock>,
}

impl LocalRateLimiter {
    /// Create a limiter on the system clock
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    /// Create a limiter on a custom clock
    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(CounterStore::new(max_entries)),
            clock,
        }
    }

    /// Count a request from `headers` against `policy`
    pub fn check_local(&self, policy: &RateLimitPolicy, headers: &ClientHeaders) -> RateLimitResult {
        let user_id = derive_client_id(headers);
        let now = self.clock.now_ms();
        let window_ms = policy.window_ms();

        let mut store = self.store.lock();
        store.cleanup(now);

        match store.get_mut(&user_id) {
            // Hard reset: nothing of the previous window carries over.
            Some(entry) if entry.is_expired(now) => {
                *entry = RateLimitEntry::fresh(now, window_ms);
                RateLimitResult::allowed(user_id)
            }
            Some(entry) => {
                entry.last_accessed = now;
                if entry.count >= policy.limit {
                    debug!(
                        user_id = %user_id,
                        count = entry.count,
                        limit = policy.limit,
                        "Local rate limit exceeded"
                    );
                    // At `now == reset_at` the window is still open; report
                    // a positive wait.
                    let remaining = entry.reset_at.saturating_sub(now).max(1);
                    return RateLimitResult::limited(user_id, remaining);
                }
                entry.count += 1;
                RateLimitResult::allowed(user_id)
            }
            None => {
                store.reserve_slot();
                store.insert(user_id.clone(), RateLimitEntry::fresh(now, window_ms));
                RateLimitResult::allowed(user_id)
            }
        }
    }

    /// Run store maintenance outside of a check
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now_ms();
        self.store.lock().cleanup(now)
    }

    /// Number of tracked clients
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Snapshot of a client's entry
    pub fn entry(&self, user_id: &str) -> Option<RateLimitEntry> {
        self.store.lock().get(user_id).copied()
    }
}
