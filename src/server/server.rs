//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::DefaultHeaders,
    web,
};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");
        let state = AppState::from_config(config.clone())?;

        Ok(Self {
            config: config.server.clone(),
            state,
        })
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let server_config = &state.config.server;
        let cors = Self::build_cors(server_config);

        let json_config = web::JsonConfig::default()
            .limit(server_config.max_body_size)
            .error_handler(|err, _req| {
                warn!("Rejected request body: {}", err);
                GatewayError::bad_request(format!("Invalid request body: {}", err)).into()
            });

        App::new()
            .app_data(state)
            .app_data(json_config)
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", "folio-gateway")))
            .configure(routes::configure_routes)
    }

    fn build_cors(config: &ServerConfig) -> Cors {
        let cors_config = &config.cors;
        let mut cors = Cors::default();

        if !cors_config.enabled {
            return cors;
        }

        if cors_config.allows_all_origins() {
            cors = cors.allow_any_origin();
        } else {
            for origin in &cors_config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        let methods: Vec<actix_web::http::Method> = cors_config
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        if !methods.is_empty() {
            cors = cors.allowed_methods(methods);
        }

        let headers: Vec<actix_web::http::header::HeaderName> = cors_config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        if !headers.is_empty() {
            cors = cors.allowed_headers(headers);
        }

        cors.max_age(cors_config.max_age as usize)
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    fn format_bind_error(error: std::io::Error, bind_addr: &str) -> GatewayError {
        if error.kind() == std::io::ErrorKind::AddrInUse {
            GatewayError::config(format!(
                "{} is already in use; set FOLIO_PORT or server.port to another port",
                bind_addr
            ))
        } else {
            GatewayError::config(format!("Failed to bind {}: {}", bind_addr, error))
        }
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
