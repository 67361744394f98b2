//! Storage backends
//!
//! The only external store is the optional Redis instance that holds the
//! shared rate-limit counters.

/// Redis shared counter store
#[cfg(feature = "redis")]
pub mod redis;
