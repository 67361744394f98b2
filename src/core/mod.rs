//! Core functionality for the gateway
//!
//! Request-independent logic behind the HTTP routes.

pub mod analytics; // Pageview validation and visitor hashing
pub mod completion; // Upstream chat completion client
pub mod contact;
pub mod projects;
pub mod rate_limiter; // Rate limiting system
pub mod security;
