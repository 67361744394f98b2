//! Test suite for folio-gateway
//!
//! ### 1. Common Utilities (`common/`)
//! Fixtures for configuration, request headers and request bodies.
//!
//! ### 2. Integration Tests (`integration/`)
//! Tests that drive the public API: rate limiting across backends,
//! configuration layering, error responses and the HTTP routes.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all tests
//! cargo test --all-features
//!
//! # Run only integration tests
//! cargo test --test lib --all-features
//!
//! # Without the Redis backend
//! cargo test --no-default-features
//! ```

pub mod common;
pub mod integration;
