mod app;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;

use crate::config::ServerConfig;

/// `AuthN` gate server: runs the gate in front of demo routes.
#[derive(Parser, Debug)]
#[command(name = "authn-gate-server", version, about)]
struct Args {
    /// YAML configuration file. `AUTHN_GATE__*` env vars override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate configuration and exit without serving.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ServerConfig::load(args.config.as_deref())?;
    logging::init(&config.logging)?;

    let state = app::build_gate(&config)?;

    if args.check {
        tracing::info!(bind_addr = %config.bind_addr, "Configuration is valid");
        return Ok(());
    }

    serve(&config.bind_addr, app::build_router(state)).await
}

async fn serve(bind_addr: &str, router: Router) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C, serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("HTTP server shutting down gracefully (Ctrl-C)");
}
