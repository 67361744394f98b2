//! Bounded in-process counter store

use super::types::RateLimitEntry;
use std::collections::HashMap;
use tracing::debug;

/// Client id -> counting window, bounded to `max_entries`
#[derive(Debug)]
pub struct CounterStore {
    entries: HashMap<String, RateLimitEntry>,
    max_entries: usize,
}

impl CounterStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&RateLimitEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut RateLimitEntry> {
        self.entries.get_mut(key)
    }

    /// Insert or replace without any bounding
    pub fn insert(&mut self, key: String, entry: RateLimitEntry) {
        self.entries.insert(key, entry);
    }

    /// Drop expired windows, then evict least recently accessed entries until
    /// the store is back at capacity. Returns how many entries were removed.
    pub fn cleanup(&mut self, now: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let expired = before - self.entries.len();

        let evicted = self.evict_to(self.max_entries);
        if expired + evicted > 0 {
            debug!(
                expired,
                evicted,
                remaining = self.entries.len(),
                "Rate limit store cleanup"
            );
        }
        expired + evicted
    }

    /// Make room for one more key so an insert keeps the store at capacity
    pub fn reserve_slot(&mut self) -> usize {
        self.evict_to(self.max_entries - 1)
    }

    fn evict_to(&mut self, target: usize) -> usize {
        if self.entries.len() <= target {
            return 0;
        }

        let excess = self.entries.len() - target;
        let mut by_recency: Vec<(u64, String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.last_accessed, key.clone()))
            .collect();
        by_recency.sort_unstable();

        for (_, key) in by_recency.into_iter().take(excess) {
            self.entries.remove(&key);
        }
        excess
    }
}
