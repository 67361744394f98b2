//! Shared cache availability tracking
//!
//! The monitor only observes: it is written by the connection lifecycle
//! (`on_connect`, `on_error`, `on_close`) and read by every request. It never
//! drives a reconnect loop. Once the cache is marked unavailable, requests use
//! the local limiter until `reconnect_cooldown` has elapsed, after which the
//! next request is allowed to try a fresh connection.

use super::clock::{Clock, SystemClock};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::Duration;
use tracing::{info, warn};

/// Connection state of the shared cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheState {
    /// No endpoint configured; the shared cache is never used
    Unattempted,
    /// Endpoint configured, handshake deferred to the first command
    Pending,
    /// Last handshake or command succeeded
    Connected,
    /// Last handshake or command failed, or the connection closed
    Unavailable,
}

impl CacheState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Pending,
            2 => Self::Connected,
            3 => Self::Unavailable,
            _ => Self::Unattempted,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Unattempted => 0,
            Self::Pending => 1,
            Self::Connected => 2,
            Self::Unavailable => 3,
        }
    }
}

/// Process-wide view of whether the shared cache can be used
#[derive(Debug)]
pub struct AvailabilityMonitor {
    state: AtomicU8,
    unavailable_since_ms: AtomicU64,
    reconnect_cooldown: Duration,
    clock: Arc<dyn Clock>,
}

impl AvailabilityMonitor {
    /// Optimistically available when an endpoint is configured
    pub fn new(endpoint_configured: bool, reconnect_cooldown: Duration) -> Self {
        Self::with_clock(endpoint_configured, reconnect_cooldown, Arc::new(SystemClock))
    }

    pub fn with_clock(
        endpoint_configured: bool,
        reconnect_cooldown: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let initial = if endpoint_configured {
            CacheState::Pending
        } else {
            CacheState::Unattempted
        };

        Self {
            state: AtomicU8::new(initial.as_u8()),
            unavailable_since_ms: AtomicU64::new(0),
            reconnect_cooldown,
            clock,
        }
    }

    /// Monitor for a deployment without a shared cache
    pub fn disabled() -> Self {
        Self::new(false, Duration::ZERO)
    }

    pub fn state(&self) -> CacheState {
        CacheState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether the next request should go through the shared cache
    pub fn is_available(&self) -> bool {
        match self.state() {
            CacheState::Pending | CacheState::Connected => true,
            CacheState::Unattempted => false,
            CacheState::Unavailable => {
                let since = self.unavailable_since_ms.load(Ordering::Acquire);
                let elapsed = self.clock.now_ms().saturating_sub(since);
                elapsed >= self.reconnect_cooldown.as_millis() as u64
            }
        }
    }

    /// Connection handshake (or a command) succeeded
    pub fn on_connect(&self) {
        if self.state() == CacheState::Unattempted {
            return;
        }
        let previous = self.transition(CacheState::Connected);
        if previous != CacheState::Connected {
            info!("Shared cache connected");
        }
    }

    /// Connection or command failed at the transport level
    pub fn on_error(&self, reason: &str) {
        if self.mark_unavailable() {
            warn!(
                "Shared cache unavailable ({}), using in-process rate limiting",
                reason
            );
        }
    }

    /// Connection was closed by the server or dropped
    pub fn on_close(&self) {
        if self.mark_unavailable() {
            warn!("Shared cache connection closed, using in-process rate limiting");
        }
    }

    fn mark_unavailable(&self) -> bool {
        if self.state() == CacheState::Unattempted {
            return false;
        }
        self.unavailable_since_ms
            .store(self.clock.now_ms(), Ordering::Release);
        self.transition(CacheState::Unavailable) != CacheState::Unavailable
    }

    fn transition(&self, next: CacheState) -> CacheState {
        CacheState::from_u8(self.state.swap(next.as_u8(), Ordering::AcqRel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rate_limiter::ManualClock;

    fn monitor(configured: bool, clock: Arc<ManualClock>) -> AvailabilityMonitor {
        AvailabilityMonitor::with_clock(configured, Duration::from_secs(30), clock)
    }

    #[test]
    fn test_unconfigured_is_never_available() {
        let clock = Arc::new(ManualClock::new(0));
        let m = monitor(false, clock.clone());
        assert_eq!(m.state(), CacheState::Unattempted);
        assert!(!m.is_available());

        m.on_connect();
        m.on_error("boom");
        clock.advance(Duration::from_secs(3600));
        assert_eq!(m.state(), CacheState::Unattempted);
        assert!(!m.is_available());
    }

    #[test]
    fn test_configured_starts_pending_and_available() {
        let m = monitor(true, Arc::new(ManualClock::new(0)));
        assert_eq!(m.state(), CacheState::Pending);
        assert!(m.is_available());
    }

    #[test]
    fn test_lifecycle_transitions() {
        let clock = Arc::new(ManualClock::new(1_000));
        let m = monitor(true, clock.clone());

        m.on_connect();
        assert_eq!(m.state(), CacheState::Connected);
        assert!(m.is_available());

        m.on_error("connection refused");
        assert_eq!(m.state(), CacheState::Unavailable);
        assert!(!m.is_available());

        m.on_connect();
        assert!(m.is_available());

        m.on_close();
        assert_eq!(m.state(), CacheState::Unavailable);
        assert!(!m.is_available());
    }

    #[test]
    fn test_retry_allowed_after_cooldown() {
        let clock = Arc::new(ManualClock::new(0));
        let m = monitor(true, clock.clone());
        m.on_error("timeout");

        clock.advance(Duration::from_secs(29));
        assert!(!m.is_available());

        clock.advance(Duration::from_secs(1));
        assert!(m.is_available());
        assert_eq!(m.state(), CacheState::Unavailable);
    }
}
