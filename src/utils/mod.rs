//! Shared utilities
//!
//! Error handling and logging helpers used across the gateway.

pub mod error;
pub mod logging;
