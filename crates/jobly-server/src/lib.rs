//! # jobly-server
//!
//! HTTP API for job postings on top of [`jobly_db`].
//!
//! The binary is a thin wrapper around [`run`]; integration tests drive
//! [`app::build_router`] directly.

pub mod app;
pub mod auth;
mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod input;

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

pub use app::{AppState, build_router};
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str =
    "jobly_server=info,jobly_db=info,jobly.sql=warn,tower_http=debug";

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    match cli::parse_args(&args)? {
        cli::Command::Help => {
            cli::print_help();
            Ok(())
        }
        cli::Command::Serve(args) => serve(args).await,
    }
}

async fn serve(args: cli::ServeArgs) -> anyhow::Result<()> {
    let config_path = args
        .config
        .or_else(|| std::env::var_os("JOBLY_CONFIG").map(PathBuf::from));
    let mut config = ServerConfig::load(config_path.as_deref())?;
    if let Some(url) = args.database {
        config.database.url = url;
        config.validate()?;
    }
    tracing::debug!(?config, "configuration loaded");

    let pool = jobly_db::create_pool_with_config(&config.database.url, config.database.pool_size)
        .context("failed to create database pool")?;

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let state = Arc::new(AppState::new(config, pool));
    let router = build_router(state);

    tracing::info!(%addr, "jobly-server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("jobly-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
