//! Property Listing API - Server Binary
//!
//! This binary starts the HTTP API server over the hosted record service.
//!
//! # Usage
//!
//! ```bash
//! APPER_PROJECT_ID=... APPER_PUBLIC_KEY=... APPER_BASE_URL=https://... \
//!     cargo run --bin property-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `APPER_PROJECT_ID` - Record service project (required)
//! * `APPER_PUBLIC_KEY` - Record service public key (required)
//! * `APPER_BASE_URL` - Record service API root (required)
//! * `APPER_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_property::{PropertyService, TracingFeedback};
use infra_apper::{ApperConfig, ApperHttpClient};
use interface_api::{config::ApiConfig, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Failed to load API configuration")?;

    init_tracing(&config.log_level);

    let apper = ApperConfig::from_env().context("Failed to load record service configuration")?;
    tracing::info!(
        host = %config.host,
        port = %config.port,
        project = %apper.project_id,
        base_url = %apper.base_url,
        "Starting property listing API server"
    );

    let client = ApperHttpClient::new(apper).context("Failed to build record service client")?;
    let service = PropertyService::new(Arc::new(client), Arc::new(TracingFeedback));

    let app = create_router(service);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over `log_level`
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM so in-flight requests can finish
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
