// CLI module for painvestex
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;
use std::path::PathBuf;

/// painvestex - question answering over Google's Generative Language API
#[derive(Parser)]
#[command(name = "painvestex", version, about, long_about = None)]
pub struct Args {
    /// API key for the Generative Language API
    #[arg(long, env = "PALM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to a TOML config file (defaults to ~/.painvestex/config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Address to bind, overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overrides `server.port`
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("config", &self.config)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "painvestex",
            "--api-key",
            "AIzaTestKey",
            "--port",
            "5000",
        ])
        .unwrap();
        assert_eq!(args.port, Some(5000));
        assert_eq!(args.api_key.as_deref(), Some("AIzaTestKey"));
        assert!(!format!("{:?}", args).contains("AIzaTestKey"));
    }
}
