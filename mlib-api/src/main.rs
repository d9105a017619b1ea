//! mlib-api - music library API server
//!
//! Serves the song/favorite REST API, uploaded audio under `/uploads` and the
//! browser client at `/`.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use mlib_api::config::Args;
use mlib_api::{build_router, AppState, FileStorage};
use mlib_common::config::{load_toml_config, ServerConfig};
use mlib_common::db::init_database;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing is up so the TOML log level can apply
    let file = load_toml_config(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let file_found = file.is_some();
    let config = ServerConfig::resolve(args.overrides(), file).context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "mlib_api={0},mlib_common={0},tower_http={0}",
                    config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting mlib-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if file_found {
        info!("Loaded config file {}", args.config.display());
    } else {
        warn!("Config file {} not found, using defaults", args.config.display());
    }
    info!("Favorites mode: {}", config.favorites_mode);

    let pool = init_database(&config.database_url)
        .await
        .context("Failed to open document store")?;

    let storage = FileStorage::new(&config.upload_dir);
    storage
        .ensure_root()
        .await
        .with_context(|| format!("Failed to create {}", config.upload_dir.display()))?;
    info!("Upload directory: {}", config.upload_dir.display());

    let state = AppState::new(pool, storage, &config);
    let app = build_router(state, &config.client_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mlib-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
