use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::api::{self, ProxyState, SharedState};
use super::forward::build_client;
use crate::proxy_config::EdgeToml;

/// Configuration for the proxy server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub edge: EdgeToml,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let edge = EdgeToml::default();
        Self {
            host: edge.server.host.clone(),
            port: edge.server.port,
            edge,
        }
    }
}

impl From<EdgeToml> for ServerConfig {
    fn from(edge: EdgeToml) -> Self {
        Self {
            host: edge.server.host.clone(),
            port: edge.server.port,
            edge,
        }
    }
}

/// Build the full router: health check plus the proxy on every other path.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route(
            "/health",
            get(api::health_check).fallback(api::proxy_handler),
        )
        .fallback(api::proxy_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the proxy server and run until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let client = build_client().context("Failed to build HTTP client")?;
    let state = ProxyState::from_config(&config.edge, client)
        .context("Invalid proxy configuration")?;
    let mount = state.route.mount().to_string();
    let backend = state.route.backend_root().to_string();
    let app = build_router(Arc::new(state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!(%local_addr, %mount, %backend, "SalesQuest edge proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Shutting down...");
}
