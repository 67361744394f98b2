//! Project catalog endpoints

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};

/// Configure project routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .route("", web::get().to(list_projects))
            .route("/{slug}", web::get().to(get_project)),
    );
}

/// List every project
pub async fn list_projects(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.projects.all())))
}

/// Fetch one project by slug
pub async fn get_project(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let project = state.projects.find(&slug)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(project)))
}
