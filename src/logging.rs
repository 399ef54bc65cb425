//! Structured logging initialization for the binaries.
//!
//! The library itself only emits `tracing` events and never installs a
//! subscriber. Log lines go to stderr so they do not mix with frame dumps.
//! The RUST_LOG environment variable takes precedence over the configured level.

use std::io;

use tracing::Subscriber;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Initialize the logging subsystem.
///
/// # Example
///
/// ```ignore
/// use spdy::config::LoggingConfig;
/// use spdy::logging;
///
/// logging::init(&LoggingConfig::default());
/// tracing::info!("reading capture");
/// ```
pub fn init(config: &LoggingConfig) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(config.level.as_str())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(config))
        .init();
}

/// The fmt layer for the configured format, with or without timestamps.
fn fmt_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(config.target);

    match (config.format, config.timestamps) {
        (LogFormat::Pretty, true) => layer.pretty().boxed(),
        (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
        (LogFormat::Json, true) => layer.json().boxed(),
        (LogFormat::Json, false) => layer.json().without_time().boxed(),
        (LogFormat::Compact, true) => layer.compact().boxed(),
        (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
    }
}
