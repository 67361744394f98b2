//! Logging utilities
//!
//! Subscriber setup plus redaction helpers for anything that may carry
//! credentials (cache URLs, upstream error bodies, email addresses).

mod sanitization;
#[cfg(test)]
mod tests;

pub use sanitization::Sanitization;

use crate::config::LoggingConfig;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Subscriber for the configuration phase, before `init_tracing` can run
///
/// Loading configuration logs every clamped or discarded setting; this keeps
/// those lines visible. `RUST_LOG` applies, otherwise `info`.
pub fn startup_subscriber<W>(writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .finish()
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Calling this twice
/// is harmless; the second installation is ignored.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
