//! Configuration data structures for the painvestex service.
//!
//! This module defines the schema for the application settings, including
//! server parameters, the upstream Generative Language API, and answer
//! generation limits.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::genai::GenerationMethod;
use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Generative Language API settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Answer generation settings.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `4000`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the upstream Generative Language API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the REST API, without a trailing slash.
    /// Default: `https://generativelanguage.googleapis.com/v1beta`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Generation method a model must advertise to be selected at startup.
    /// Default: `generateContent`
    #[serde(default)]
    pub generation_method: GenerationMethod,

    /// Connection and request timeout in seconds.
    /// Default: `120`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Page size used when listing models.
    /// Default: `50`
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Maximum number of retries for the startup model listing.
    /// Generation requests are never retried.
    /// Default: `3`
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Settings for answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Upper bound on generated output, in tokens.
    /// Default: `800`
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            generation_method: GenerationMethod::default(),
            timeout_seconds: default_timeout(),
            page_size: default_page_size(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_page_size() -> u32 {
    50
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_output_tokens() -> u32 {
    800
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
