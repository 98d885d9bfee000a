use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod context;
pub mod error;
pub mod projection;
pub mod routes;
pub mod session;
pub mod upstream;
pub mod utils;
pub mod validation;

use config::Config;
use context::AppContext;

/// Serve the router on an already bound listener until Ctrl-C
pub async fn serve(listener: TcpListener, app_context: Arc<AppContext>) -> Result<()> {
    let app = routes::create_router(app_context);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received. Shutting down...");
        })
        .await
        .context("Failed to start server")
}

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("=== Dashboard API Starting ===");
    tracing::info!(
        environment = ?config.environment,
        dashboard_url = %config.dashboard_url,
        upstream = %config.upstream.graphql_url,
        circuit_breaker = config.upstream.circuit_breaker.enabled,
        "Configuration loaded"
    );

    let bind_address = config.bind_address();
    let app_context = Arc::new(AppContext::from_config(config)?);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;
    tracing::info!("Listening on http://{}", bind_address);

    serve(listener, app_context).await
}
