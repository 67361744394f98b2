//! Server builder and run_server function

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use crate::utils::logging::{init_tracing, startup_subscriber};
use std::path::Path;
use tracing::info;
use tracing::instrument::WithSubscriber;
use tracing_subscriber::fmt::MakeWriter;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::config("Configuration is required"))?;

        HttpServer::new(&config)
    }
}

/// Load configuration with its diagnostics written to `writer`
///
/// The global subscriber depends on the logging section, so it cannot exist
/// yet; a startup subscriber is scoped to the load instead.
pub async fn load_config<W>(path: &Path, writer: W) -> Result<Config>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    Config::load(path)
        .with_subscriber(startup_subscriber(writer))
        .await
}

/// Load configuration from `config_path` (or the default location) and serve
pub async fn run_server(config_path: Option<&Path>) -> Result<()> {
    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    let config = load_config(path, std::io::stderr).await?;
    init_tracing(&config.logging);

    info!(
        "Starting folio gateway {} ({})",
        crate::VERSION,
        crate::build_info().git_hash
    );

    let server = ServerBuilder::new().with_config(config).build()?;
    info!("Server starting at: http://{}", server.config().address());
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   POST /contact - Contact form");
    info!("   POST /chat - Chat assistant");
    info!("   POST /analytics/pageview - Pageview analytics");
    info!("   GET  /projects - Project catalog");
    info!("   GET  /projects/{{slug}} - Project details");

    server.start().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::{self, Write};
    use std::sync::Arc;

    /// Writer collecting log output in memory
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_config_logs_before_global_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.yaml");
        std::fs::write(&path, "rate_limits:\n  chat_limit: 1000\nredis:\n  url: \"localhost:6379\"\n")
            .unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let config = load_config(&path, move || writer.clone()).await.unwrap();

        assert_eq!(config.rate_limits.chat_limit, 100);
        assert!(!config.redis.is_configured());

        let output = captured.contents();
        assert!(output.contains("CHAT_RATE_LIMIT=1000 is above the maximum"));
        assert!(output.contains("shared rate limiting disabled"));
        assert!(output.contains("WARN"));
    }

    #[tokio::test]
    async fn test_load_config_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let captured = Captured::default();
        let writer = captured.clone();

        load_config(&dir.path().join("absent.yaml"), move || writer.clone())
            .await
            .unwrap();

        assert!(captured.contents().contains("not found"));
    }
}
