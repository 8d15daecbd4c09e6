//! Mixtape Gateway - public upload/download service for mixtape archives
//!
//! Configuration comes from the environment (or matching flags); see
//! `mixtape-gateway --help`.

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use mixtape_gateway::{http_server, Args, Config, ConfigError, GatewayState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let (non_blocking_writer, log_guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_level = args.log_level();
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();

    tracing::info!("Starting Mixtape Gateway");

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            if matches!(e, ConfigError::MissingStoreSettings(_)) {
                tracing::error!(
                    "Set R2_ACCOUNT_ID, R2_ACCESS_KEY_ID and R2_SECRET_ACCESS_KEY, \
                     or choose another STORAGE_BACKEND"
                );
            }
            drop(log_guard);
            std::process::exit(1);
        }
    };

    let state = match GatewayState::from_config(config.store.clone(), config.base_url.clone()).await
    {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to create archive store: {}", e);
            drop(log_guard);
            std::process::exit(1);
        }
    };

    tracing::info!(
        backend = state.store().backend(),
        bucket = ?config.bucket(),
        base_url = %config.base_url,
        "Archive store ready"
    );

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let graceful_shutdown = async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                // Keep the sender alive so the server isn't shut down by its drop
                tracing::error!("Failed to listen for ctrl+c: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    tokio::spawn(graceful_shutdown);

    http_server::run(config, state, shutdown_rx).await?;

    tracing::info!("Gateway shutdown complete");
    Ok(())
}
