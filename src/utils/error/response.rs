//! HTTP response handling for errors

use super::types::GatewayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.status_and_code();

        // Internal failures never leak their detail to callers.
        let message = if status_code.is_server_error() || status_code == StatusCode::BAD_GATEWAY
        {
            "Something went wrong. Please try again later.".to_string()
        } else {
            self.to_string()
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None,
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

impl GatewayError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            #[cfg(feature = "redis")]
            GatewayError::Redis(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR"),
            GatewayError::Cache(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR"),
            GatewayError::RateLimit(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            GatewayError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            GatewayError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            GatewayError::Parsing(_) => (StatusCode::BAD_REQUEST, "PARSING_ERROR"),
            GatewayError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            GatewayError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            GatewayError::External(_) | GatewayError::HttpClient(_) => {
                (StatusCode::BAD_GATEWAY, "EXTERNAL_ERROR")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}
