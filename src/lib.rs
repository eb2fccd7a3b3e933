//! jar-deploy-agent - remote JVM deployment agent
//!
//! Library entry point: module wiring plus the init-and-serve bootstrap

pub mod error;
pub mod middleware;
pub mod infra;
pub mod domain;
pub mod config;
pub mod state;
pub mod api;
pub mod services;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Options parsed from the command line.
#[derive(Debug, Default)]
pub struct RuntimeConfig {
    pub port_override: Option<u16>,
}

/// Initializes logging, loads configuration and serves the API until the
/// process is stopped.
pub async fn init_and_run(runtime: RuntimeConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = config::EnvConfig::from_env();
    if let Some(port) = runtime.port_override {
        config.port = port;
    }

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(
        version = config::env::constants::VERSION,
        addr = %addr,
        "Starting jar-deploy-agent"
    );

    let state = Arc::new(state::AppState::new(config));
    let app = api::router(state);

    match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Server exited");
            }
        }
        Err(e) => tracing::error!(addr = %addr, error = %e, "Failed to bind listener"),
    }
}
