// painvestex - question answering over Google's Generative Language API
// Author: kelexine (https://github.com/kelexine)

use anyhow::{Context, Result};
use clap::Parser;
use painvestex::assistant::Assistant;
use painvestex::cli::Args;
use painvestex::config::AppConfig;
use painvestex::genai::{ApiKey, GenerativeClient};
use painvestex::server::create_router;
use painvestex::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Phase 0: Pick up PALM_API_KEY and friends from .env, if present
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting painvestex v{}", env!("CARGO_PKG_VERSION"));

    let api_key = args
        .api_key
        .filter(|k| !k.is_empty())
        .map(ApiKey::new)
        .context("PALM_API_KEY is not set")?;

    // Phase 3: Resolve the generative model once; absence is permanent
    let client = GenerativeClient::new(&config.provider, api_key)?;
    info!(
        "Resolving a model supporting {} from {}",
        config.provider.generation_method,
        client.base_url()
    );
    let model = client.resolve_model().await?;
    if model.is_none() {
        warn!("No suitable AI model found; questions will be refused until restart");
    }

    let assistant = Arc::new(Assistant::new(model, Arc::new(client), &config.assistant));

    // Phase 4: Build and start HTTP server
    let app = create_router(assistant);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
