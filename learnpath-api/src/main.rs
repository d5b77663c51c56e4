//! learnpath-api - LearnPath e-learning backend
//!
//! Serves the course catalog and per-learner progress, quizzes, bookmarks,
//! settings, stats and recommendations from an in-memory record store.

use anyhow::{Context, Result};
use clap::Parser;
use learnpath_common::config::{ConfigOverrides, ConfigResolver};
use learnpath_common::LearnStore;
use learnpath_api::{build_router, AppState};
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "learnpath-api", version, about = "LearnPath e-learning backend")]
struct Args {
    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind the HTTP listener to
    #[arg(long)]
    bind: Option<String>,

    /// HTTP server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Simulated latency applied to every store call, in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Resolution does not log, so nothing is lost before the subscriber exists
    let resolved = ConfigResolver::new(ConfigOverrides {
        config_path: args.config,
        bind_address: args.bind,
        port: args.port,
        latency_ms: args.latency_ms,
    })
    .resolve()?;
    let config = resolved.config;

    // RUST_LOG wins over the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting LearnPath API (learnpath-api) v{}",
        env!("CARGO_PKG_VERSION")
    );
    resolved.source.log();

    let store = match &config.seed_file {
        Some(path) => {
            info!("Seed data: {}", path.display());
            LearnStore::from_file(path)
                .with_context(|| format!("Failed to load seed data from {}", path.display()))?
        }
        None => LearnStore::bundled()?,
    };
    let store = store.with_latency(Duration::from_millis(config.latency_ms));
    if config.latency_ms > 0 {
        info!("Simulated store latency: {}ms", config.latency_ms);
    }

    let app = build_router(AppState::new(store));

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("learnpath-api listening on http://{}", address);
    info!("Health check: http://{}/health", address);

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
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
