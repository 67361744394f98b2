//! Pageview analytics
//!
//! Visitor addresses never leave this module in clear: they are hashed with
//! a salt before an event is built.

use crate::config::AnalyticsConfig;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, VecDeque};
use tracing::info;

pub const MAX_PATH_LENGTH: usize = 512;
pub const MAX_REFERRER_LENGTH: usize = 2048;

/// Hex characters of the digest kept as the visitor hash
const VISITOR_HASH_LENGTH: usize = 16;

/// Pageview body as received
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageviewRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
}

/// A recorded pageview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageviewEvent {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    pub visitor_hash: String,
    pub recorded_at: DateTime<Utc>,
}

impl PageviewRequest {
    /// Validate the request and build an event for `address`
    pub fn into_event(
        self,
        address: Option<&str>,
        salt: &str,
    ) -> Result<PageviewEvent, BTreeMap<&'static str, String>> {
        let mut errors = BTreeMap::new();

        let path = self.path.unwrap_or_default();
        if path.is_empty() {
            errors.insert("path", "Path is required".to_string());
        } else if !path.starts_with('/') {
            errors.insert("path", "Path must start with '/'".to_string());
        } else if path.chars().count() > MAX_PATH_LENGTH {
            errors.insert(
                "path",
                format!("Path must be at most {} characters", MAX_PATH_LENGTH),
            );
        }

        let referrer = self.referrer.filter(|r| !r.is_empty());
        if referrer
            .as_ref()
            .is_some_and(|r| r.chars().count() > MAX_REFERRER_LENGTH)
        {
            errors.insert(
                "referrer",
                format!("Referrer must be at most {} characters", MAX_REFERRER_LENGTH),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PageviewEvent {
            path,
            referrer,
            visitor_hash: visitor_hash(salt, address.unwrap_or("unknown")),
            recorded_at: Utc::now(),
        })
    }
}

/// Salted SHA-256 of the visitor address, truncated
pub fn visitor_hash(salt: &str, address: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(address.as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(VISITOR_HASH_LENGTH);
    digest
}

/// Bounded in-memory log of recent pageviews, oldest dropped first
#[derive(Debug)]
pub struct PageviewLog {
    events: Mutex<VecDeque<PageviewEvent>>,
    capacity: usize,
}

impl PageviewLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self::new(config.max_events)
    }

    pub fn record(&self, event: PageviewEvent) {
        info!(
            path = %event.path,
            referrer = event.referrer.as_deref().unwrap_or(""),
            visitor = %event.visitor_hash,
            "Pageview recorded"
        );

        let mut events = self.events.lock();
        if events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Most recent `limit` events, newest last
    pub fn recent(&self, limit: usize) -> Vec<PageviewEvent> {
        let events = self.events.lock();
        let skip = events.len().saturating_sub(limit);
        events.iter().skip(skip).cloned().collect()
    }
}
