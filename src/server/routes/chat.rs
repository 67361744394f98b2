//! Chat assistant endpoint
//!
//! The chat UX never hard-fails: rate limiting and upstream problems both
//! answer with a normal chat payload the widget can render.

use crate::core::security::{IncomingMessage, process_messages};
use crate::server::state::AppState;
use crate::server::utils::client_headers;
use crate::utils::error::GatewayError;
use crate::utils::logging::Sanitization;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Configure chat routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat", web::post().to(chat));
}

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
}

/// Chat reply payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub rate_limited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_minutes: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl ChatResponse {
    fn reply(message: String) -> Self {
        Self {
            message,
            rate_limited: false,
            retry_after_minutes: None,
            fallback: false,
        }
    }

    fn fallback(message: String) -> Self {
        Self {
            fallback: true,
            ..Self::reply(message)
        }
    }

    fn limited(minutes: u64) -> Self {
        Self {
            message: format!(
                "You've sent a lot of messages. Please wait about {} minute{} before asking again.",
                minutes,
                if minutes == 1 { "" } else { "s" }
            ),
            rate_limited: true,
            retry_after_minutes: Some(minutes),
            fallback: false,
        }
    }
}

/// Answer a chat conversation
pub async fn chat(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ChatRequest>,
) -> ActixResult<HttpResponse> {
    let headers = client_headers(&req);
    let limit = state.chat_limiter.check(&headers).await;

    if limit.is_limited {
        let minutes = limit.retry_after_minutes().unwrap_or(1);
        let seconds = limit.retry_after_secs().unwrap_or(60);
        warn!(user_id = %limit.user_id, "Chat rate limited");
        return Ok(HttpResponse::TooManyRequests()
            .insert_header((header::RETRY_AFTER, seconds.to_string()))
            .json(ChatResponse::limited(minutes)));
    }

    let mut messages = process_messages(body.into_inner().messages);
    if messages.is_empty() {
        return Err(GatewayError::bad_request("No valid messages provided").into());
    }

    let max_history = state.config.chat.max_history;
    if messages.len() > max_history {
        messages.drain(..messages.len() - max_history);
    }

    let fallback_message = &state.config.chat.fallback_message;
    let Some(client) = state.completion.as_ref() else {
        debug!("No completion client configured, answering with fallback");
        return Ok(HttpResponse::Ok().json(ChatResponse::fallback(fallback_message.clone())));
    };

    match client.complete(&messages).await {
        Ok(reply) => Ok(HttpResponse::Ok().json(ChatResponse::reply(reply))),
        Err(e) => {
            error!(
                user_id = %limit.user_id,
                "Chat completion failed: {}",
                Sanitization::sanitize_log_data(&e.to_string())
            );
            Ok(HttpResponse::Ok().json(ChatResponse::fallback(fallback_message.clone())))
        }
    }
}
