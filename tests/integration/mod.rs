//! Integration tests for folio-gateway
//!
//! These tests verify the interaction between multiple components through
//! the crate's public API.

pub mod config_validation_tests;
pub mod error_handling_tests;
pub mod rate_limit_tests;
pub mod routes_tests;
