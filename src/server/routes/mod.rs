//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.

pub mod analytics;
pub mod chat;
pub mod contact;
pub mod health;
pub mod projects;

use actix_web::web;

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Register every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(contact::configure_routes)
        .configure(chat::configure_routes)
        .configure(analytics::configure_routes)
        .configure(projects::configure_routes);
}
