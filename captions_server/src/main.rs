//! Captions API — YouTube auto-captions to plain text.
//!
//! A standalone binary that wraps `yt-dlp`: it probes a video for the
//! caption languages it advertises, downloads the best matching WebVTT
//! track, and returns it flattened to text as JSON.

mod config;
mod error;
mod metrics;
mod models;
mod routes;
mod services;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Parser;

use crate::services::ytdlp::YtDlp;

#[derive(Parser)]
#[command(name = "captions-api", version, about = "YouTube auto-captions to text API")]
struct Cli {
    /// Server port
    #[arg(short, long, env = "CAPTIONS_PORT", default_value = "8000")]
    port: u16,

    /// Address to bind
    #[arg(long, env = "CAPTIONS_HOST", default_value = "0.0.0.0")]
    host: IpAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    }

    let cli = Cli::parse();

    tracing::info!("Starting Captions API...");

    let config = config::CaptionsConfig::from_env();

    tokio::fs::create_dir_all(&config.work_dir)
        .await
        .map_err(|e| anyhow::anyhow!("work dir {}: {e}", config.work_dir.display()))?;
    services::cookies::write_cookie_file(&config).await?;

    tracing::info!(
        ytdlp = %config.ytdlp_bin,
        work_dir = %config.work_dir.display(),
        max_concurrent = config.max_concurrent_fetches,
        default_lang = %config.default_lang,
        "yt-dlp driver configured"
    );

    // Initialize metrics
    metrics::init_metrics(config.metrics_port);

    let source = Arc::new(YtDlp::from_config(&config));
    let state = routes::AppState::new(config, source);
    let app = routes::app_router(state);

    // Start server
    let addr = SocketAddr::new(cli.host, cli.port);
    tracing::info!("Captions API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
