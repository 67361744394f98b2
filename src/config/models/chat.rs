//! Chat proxy configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Upstream completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of an OpenAI compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// API key; chat falls back to the canned reply when unset
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
    /// System prompt prepended to every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Maximum completion tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Most recent messages forwarded upstream
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// Reply used whenever the upstream call fails
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            model: default_model(),
            system_prompt: default_system_prompt(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_history: default_max_history(),
            fallback_message: default_fallback_message(),
        }
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether an upstream can be called at all
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Replace an unparseable `api_base` with the default endpoint
    pub fn reset_invalid_api_base(&mut self) {
        if let Err(e) = url::Url::parse(&self.api_base) {
            let fallback = default_api_base();
            warn!(
                "Chat api_base {:?} is invalid ({}), using {}",
                self.api_base, e, fallback
            );
            self.api_base = fallback;
        }
    }

    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.api_base).map_err(|e| format!("Invalid chat api_base: {}", e))?;
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("Chat temperature must be between 0.0 and 2.0".to_string());
        }
        if self.max_history == 0 {
            return Err("Chat max_history must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Chat timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_system_prompt() -> String {
    "You are the assistant on a personal portfolio site. Answer questions about the \
     owner's projects, case studies and experience concisely and politely. If you do \
     not know something, say so and suggest using the contact form."
        .to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_history() -> usize {
    20
}

fn default_fallback_message() -> String {
    "Sorry, I'm having trouble answering right now. Please try again in a moment, \
     or reach out through the contact form."
        .to_string()
}
