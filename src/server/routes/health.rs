//! Health check endpoint

use crate::core::rate_limiter::CacheState;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Health status payload
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: &'static str,
    pub shared_cache: CacheState,
    pub chat_backend: &'static str,
    pub local_entries: LocalEntries,
    pub pageviews: usize,
    pub chat_upstream: bool,
}

/// Clients currently tracked by each in-process store
#[derive(Debug, Serialize)]
pub struct LocalEntries {
    pub chat: usize,
    pub contact: usize,
}

/// Basic health check endpoint
///
/// The service is healthy whenever it can answer: a lost shared cache only
/// degrades rate limiting to per-instance counting.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let shared_cache = state.monitor.state();
    let health_status = HealthStatus {
        status: if shared_cache == CacheState::Unavailable {
            "degraded"
        } else {
            "healthy"
        },
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        shared_cache,
        chat_backend: if state.monitor.is_available() {
            "shared_cache"
        } else {
            "local"
        },
        local_entries: LocalEntries {
            chat: state.chat_limiter.local_entries(),
            contact: state.contact_limiter.local_entries(),
        },
        pageviews: state.pageviews.len(),
        chat_upstream: state.completion.is_some(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(health_status)))
}
