//! Edge proxy server command — `salesquest-edge serve`.

use anyhow::Result;
use std::path::Path;
use tracing::warn;

use salesquest_edge::proxy::server::{ServerConfig, start_server};
use salesquest_edge::proxy_config;

pub async fn cmd_serve(
    work_dir: &Path,
    explicit: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    backend: Option<String>,
) -> Result<()> {
    let mut edge = proxy_config::resolve(work_dir, explicit)?;
    if let Some(host) = host {
        edge.server.host = host;
    }
    if let Some(port) = port {
        edge.server.port = port;
    }
    if let Some(backend) = backend {
        edge.backend.base_url = backend;
    }

    let warnings = edge.validate();
    if !warnings.is_empty() {
        for warning in &warnings {
            warn!("{}", warning);
        }
        anyhow::bail!(
            "Refusing to start with {} configuration problem(s)",
            warnings.len()
        );
    }

    start_server(ServerConfig::from(edge)).await
}
