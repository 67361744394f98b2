//! Upstream chat completion client
//!
//! Talks to any OpenAI compatible `/chat/completions` endpoint. The chat
//! route treats every error from here the same way: it logs the redacted
//! detail and answers with the configured fallback text.

use crate::config::ChatConfig;
use crate::core::security::{ChatMessage, MessageRole};
use crate::utils::error::{GatewayError, Result};
use crate::utils::logging::Sanitization;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Capability to produce an assistant reply for a conversation
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: MessageRole,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for OpenAI compatible completion APIs
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    http_client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiCompatibleClient {
    /// Build a client from chat configuration; `None` when no key is set
    pub fn from_config(config: &ChatConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.as_deref().filter(|_| config.has_credentials()) else {
            return Ok(None);
        };

        let http_client = ClientBuilder::new()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Some(Self {
            http_client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request<'a>(&'a self, messages: &'a [ChatMessage]) -> CompletionRequest<'a> {
        let system = CompletionMessage {
            role: MessageRole::System,
            content: &self.system_prompt,
        };
        let conversation = messages.iter().map(|m| CompletionMessage {
            role: m.role,
            content: &m.content,
        });

        CompletionRequest {
            model: &self.model,
            messages: std::iter::once(system).chain(conversation).collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = self.build_request(messages);
        debug!(
            model = %self.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::timeout(format!("Completion request timed out: {}", e))
                } else {
                    GatewayError::HttpClient(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::external(format!(
                "Completion API returned {}: {}",
                status,
                Sanitization::sanitize_log_data(&body)
            )));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::parsing(format!("Invalid completion response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GatewayError::external("Completion API returned no content"))
    }
}
