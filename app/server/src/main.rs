use anyhow::{Context, Result};
use rustls::crypto::ring::default_provider;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use txlookup_server::config::Config;
use txlookup_server::http;
use txlookup_server::lookup::TxLookup;

fn install_crypto_provider() {
    // Safe to call once; ignore error if already installed
    let _ = default_provider().install_default();
}

/// Transaction lookup server
///
/// Serves the lookup page and the `/analyze` JSON endpoint.
#[tokio::main]
async fn main() -> Result<()> {
    install_crypto_provider();
    // Before tracing, so RUST_LOG may come from .env
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    info!("Transaction lookup server starting...");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Explorer: {}", config.explorer_base_url);
    info!("Price index: {}", config.price_api_url);
    info!("Upstream timeout: {:?}", config.request_timeout);

    let lookup = Arc::new(TxLookup::new(&config).context("Failed to init upstream clients")?);
    let app = http::router(lookup);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .context("Failed to bind")?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
