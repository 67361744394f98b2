//! # Folio Gateway
//!
//! API backend for a portfolio site: a contact form, a chat assistant proxied
//! to an OpenAI compatible completion API, pageview analytics and a project
//! catalog.
//!
//! ## Rate limiting
//!
//! Contact and chat are rate limited per pseudonymous client with a fixed
//! window. Chat counts live in Redis when `REDIS_URL` is set so every
//! instance shares one window; if Redis is unreachable the gateway keeps
//! serving and counts in process until it can reconnect.
//!
//! ```rust,no_run
//! use folio_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config/folio.yaml").await?;
//!     let gateway = Gateway::new(config)?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use crate::core::rate_limiter::{
    ClientHeaders, LocalRateLimiter, RateLimitPolicy, RateLimitResult, RateLimitService,
    derive_client_id,
};
pub use crate::core::security::{ChatMessage, IncomingMessage, MessageRole, process_messages};
pub use utils::error::{GatewayError, Result};

use tracing::info;

/// A configured gateway ready to serve
pub struct Gateway {
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");
        let server = server::HttpServer::new(&config)?;
        Ok(Self { server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!("Starting folio gateway {} ({})", VERSION, build_info().git_hash);
        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Seconds since the epoch at build time
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
