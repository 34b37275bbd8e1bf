//! MetaClaw registry server entrypoint.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use metaclaw_registry::config::Config;
use metaclaw_registry::{create_router, AppState, FileStore, Registry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // An unreadable catalog is fatal.
    let store = FileStore::open(&config.data)
        .with_context(|| format!("open store {}", config.data.display()))?;
    let registry = Registry::new(Arc::new(store));

    let admin_token = config.admin_token();
    if admin_token.is_some() {
        tracing::info!("write API auth: enabled");
    } else {
        tracing::warn!("write API auth: disabled");
    }

    let app = create_router(AppState::new(registry, admin_token));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    tracing::info!(addr = %config.addr, "metaclaw-registry listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
