//! Test fixtures and data factories
//!
//! All factories create real objects, not mocks.

use folio_gateway::config::Config;
use folio_gateway::core::rate_limiter::{ClientHeaders, RateLimitPolicy};
use serde_json::{Value, json};
use std::time::Duration;

/// Factory for gateway configurations
pub struct ConfigFactory;

impl ConfigFactory {
    /// Defaults, finalized, with no external services
    pub fn local() -> Config {
        let mut config = Config::default();
        config.finalize().expect("default config is valid");
        config
    }

    /// Local configuration with tight limits for route tests
    pub fn tight_limits(chat_limit: u32, contact_limit: u32) -> Config {
        let mut config = Config::default();
        config.rate_limits.chat_limit = chat_limit;
        config.rate_limits.contact_limit = contact_limit;
        config.finalize().expect("tight limits are within bounds");
        config
    }
}

/// Factory for client headers
pub struct HeaderFactory;

impl HeaderFactory {
    pub fn browser(address: &str) -> ClientHeaders {
        ClientHeaders::new(
            Some(address.to_string()),
            Some("Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0".to_string()),
        )
    }

    pub fn anonymous() -> ClientHeaders {
        ClientHeaders::default()
    }
}

/// Factory for request bodies and policies
pub struct RequestFactory;

impl RequestFactory {
    pub fn policy(limit: u32, window_ms: u64) -> RateLimitPolicy {
        RateLimitPolicy::new(limit, Duration::from_millis(window_ms))
    }

    pub fn contact(email: &str) -> Value {
        json!({
            "name": "Alex Doe",
            "email": email,
            "subject": "Collaboration",
            "message": "Hi! I enjoyed your case studies and would like to chat."
        })
    }

    pub fn chat(content: &str) -> Value {
        json!({ "messages": [{ "role": "user", "content": content }] })
    }
}
