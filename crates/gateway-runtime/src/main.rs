//! # Tollgate Gateway
//!
//! Entry point. See the `gateway_runtime` library for the wiring.

use anyhow::Result;
use gateway_runtime::{load_config, GatewayRuntime};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Initiating graceful shutdown...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config()?;
    let runtime = GatewayRuntime::new(config)?;

    info!("Gateway is running. Press Ctrl+C to stop.");
    runtime.run(shutdown_signal()).await
}
