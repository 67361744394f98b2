//! Rate limiting for the public API routes
//!
//! Fixed-window counting per pseudonymous client, either in process or in a
//! shared cache that every instance of the service can see.

mod backend;
mod clock;
mod identity;
mod limiter;
mod monitor;
mod service;
mod shared;
mod store;
mod types;


pub use backend::{LocalBackend, RateLimitBackend, SharedCacheBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use identity::{ClientHeaders, derive_client_id};
pub use limiter::LocalRateLimiter;
pub use monitor::{AvailabilityMonitor, CacheState};
pub use service::RateLimitService;
pub use shared::{CounterReply, SharedCacheLimiter, SharedCounterStore};
pub use store::CounterStore;
pub use types::{RateLimitEntry, RateLimitPolicy, RateLimitResult};
