//! Structured logging and secret redaction.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides a helper that keeps Google API keys out of log output.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{Result, ServiceError};
use lazy_static::lazy_static;
use regex::Regex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    /// Google API keys: `AIza` followed by 35 URL-safe characters.
    static ref API_KEY_PATTERN: Regex = Regex::new(r"AIza[0-9A-Za-z_\-]{35}").unwrap();
}

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable output for development.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ServiceError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };

    result.map_err(|e| ServiceError::Internal(format!("Failed to initialize logging: {}", e)))
}

/// Replaces every Google API key in `input` with `[REDACTED_API_KEY]`.
///
/// Upstream error bodies can echo the key back, so anything read from the
/// provider passes through here before it is logged.
pub fn sanitize(input: &str) -> String {
    API_KEY_PATTERN
        .replace_all(input, "[REDACTED_API_KEY]")
        .into_owned()
}
