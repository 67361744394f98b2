//! Redis connection management
//!
//! The connection is opened on first use and kept as a cloneable multiplexed
//! handle. Transport failures drop the handle and are reported to the
//! [`AvailabilityMonitor`], which keeps requests on the in-process limiter
//! until its cooldown allows another attempt.

use crate::config::RedisConfig;
use crate::core::rate_limiter::AvailabilityMonitor;
use crate::utils::error::{GatewayError, Result};
use crate::utils::logging::Sanitization;
use parking_lot::Mutex;
use redis::{Client, FromRedisValue, RedisError, RedisResult, aio::MultiplexedConnection};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{error::Elapsed, timeout};
use tracing::{debug, info};

/// Redis connection holder
pub struct RedisPool {
    client: Client,
    connection: Mutex<Option<MultiplexedConnection>>,
    command_timeout: Duration,
    connection_timeout: Duration,
    monitor: Arc<AvailabilityMonitor>,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("command_timeout", &self.command_timeout)
            .field("connection_timeout", &self.connection_timeout)
            .field("state", &self.monitor.state())
            .finish()
    }
}

impl RedisPool {
    /// Create a pool for the configured endpoint, or `None` without one.
    ///
    /// No connection is attempted here.
    pub fn new(config: &RedisConfig, monitor: Arc<AvailabilityMonitor>) -> Result<Option<Self>> {
        let Some(url) = config.url.as_deref().filter(|_| config.is_configured()) else {
            debug!("No Redis URL configured, shared rate limiting disabled");
            return Ok(None);
        };

        info!("Using Redis for shared rate limiting: {}", Sanitization::sanitize_url(url));
        let client = Client::open(url).map_err(GatewayError::Redis)?;

        Ok(Some(Self {
            client,
            connection: Mutex::new(None),
            command_timeout: config.command_timeout(),
            connection_timeout: config.connection_timeout(),
            monitor,
        }))
    }

    pub fn monitor(&self) -> &Arc<AvailabilityMonitor> {
        &self.monitor
    }

    /// Current connection, opening one if needed
    async fn connection(&self) -> Result<MultiplexedConnection> {
        if let Some(conn) = self.connection.lock().clone() {
            return Ok(conn);
        }

        debug!("Opening Redis connection");
        match timeout(
            self.connection_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        {
            Ok(Ok(conn)) => {
                *self.connection.lock() = Some(conn.clone());
                self.monitor.on_connect();
                Ok(conn)
            }
            Ok(Err(e)) => {
                self.monitor.on_error(&e.to_string());
                Err(GatewayError::cache(format!("Failed to connect to Redis: {}", e)))
            }
            Err(_) => {
                self.monitor.on_error("connection timed out");
                Err(GatewayError::timeout(format!(
                    "Redis connection exceeded {}ms",
                    self.connection_timeout.as_millis()
                )))
            }
        }
    }

    /// Run a pipeline under the command timeout
    pub(crate) async fn query_pipeline<T: FromRedisValue>(&self, pipe: &redis::Pipeline) -> Result<T> {
        let mut conn = self.connection().await?;
        let outcome = timeout(self.command_timeout, pipe.query_async(&mut conn)).await;
        self.settle(outcome)
    }

    /// Run a single command under the command timeout
    pub(crate) async fn query_cmd<T: FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T> {
        let mut conn = self.connection().await?;
        let outcome = timeout(self.command_timeout, cmd.query_async(&mut conn)).await;
        self.settle(outcome)
    }

    fn settle<T>(&self, outcome: std::result::Result<RedisResult<T>, Elapsed>) -> Result<T> {
        match outcome {
            Ok(Ok(value)) => {
                self.monitor.on_connect();
                Ok(value)
            }
            Ok(Err(e)) => {
                if e.is_connection_dropped() {
                    self.discard();
                    self.monitor.on_close();
                } else if is_transport_error(&e) {
                    self.discard();
                    self.monitor.on_error(&e.to_string());
                }
                Err(GatewayError::Redis(e))
            }
            Err(_) => {
                self.discard();
                self.monitor.on_error("command timed out");
                Err(GatewayError::timeout(format!(
                    "Redis command exceeded {}ms",
                    self.command_timeout.as_millis()
                )))
            }
        }
    }

    fn discard(&self) {
        self.connection.lock().take();
    }
}

/// Whether an error means the connection itself is unusable
pub(crate) fn is_transport_error(e: &RedisError) -> bool {
    e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout()
}
