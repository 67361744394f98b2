//! Pageview analytics endpoint

use crate::core::analytics::PageviewRequest;
use crate::server::state::AppState;
use crate::server::utils::client_address;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde_json::json;

/// Configure analytics routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/analytics/pageview", web::post().to(record_pageview));
}

/// Record a pageview; the caller address is hashed before anything is kept
pub async fn record_pageview(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<PageviewRequest>,
) -> ActixResult<HttpResponse> {
    let address = client_address(&req);

    match body
        .into_inner()
        .into_event(address.as_deref(), &state.config.analytics.salt)
    {
        Ok(event) => {
            state.pageviews.record(event);
            Ok(HttpResponse::Ok().json(json!({ "success": true })))
        }
        Err(errors) => Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "Invalid pageview",
            "errors": errors,
        }))),
    }
}
