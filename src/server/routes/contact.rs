//! Contact form endpoint

use crate::core::contact::{ContactRequest, FieldErrors};
use crate::server::state::AppState;
use crate::server::utils::client_headers;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use tracing::{info, warn};

/// Configure contact routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/contact", web::post().to(submit_contact));
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_minutes: Option<u64>,
}

impl ContactResponse {
    fn accepted(submission_id: String) -> Self {
        Self {
            success: true,
            submission_id: Some(submission_id),
            error: None,
            errors: None,
            retry_after_minutes: None,
        }
    }

    fn invalid(errors: FieldErrors) -> Self {
        Self {
            success: false,
            submission_id: None,
            error: Some("Please correct the highlighted fields".to_string()),
            errors: Some(errors),
            retry_after_minutes: None,
        }
    }

    fn limited(minutes: u64) -> Self {
        Self {
            success: false,
            submission_id: None,
            error: Some(format!(
                "Too many messages. Please try again in {} minute{}.",
                minutes,
                if minutes == 1 { "" } else { "s" }
            )),
            errors: None,
            retry_after_minutes: Some(minutes),
        }
    }
}

/// Handle a contact form submission
pub async fn submit_contact(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ContactRequest>,
) -> ActixResult<HttpResponse> {
    let headers = client_headers(&req);
    let limit = state.contact_limiter.check(&headers).await;

    if limit.is_limited {
        let minutes = limit.retry_after_minutes().unwrap_or(1);
        let seconds = limit.retry_after_secs().unwrap_or(60);
        warn!(user_id = %limit.user_id, "Contact form rate limited");
        return Ok(HttpResponse::TooManyRequests()
            .insert_header((header::RETRY_AFTER, seconds.to_string()))
            .json(ContactResponse::limited(minutes)));
    }

    match body.into_inner().validate() {
        Ok(submission) => {
            submission.record();
            Ok(HttpResponse::Ok().json(ContactResponse::accepted(submission.id)))
        }
        Err(errors) => {
            info!(
                user_id = %limit.user_id,
                fields = ?errors.keys().collect::<Vec<_>>(),
                "Contact form rejected"
            );
            Ok(HttpResponse::BadRequest().json(ContactResponse::invalid(errors)))
        }
    }
}
