//! Daemon entry point for the Prow MCP server.
//!
//! Loads configuration from the command line and environment, builds the
//! control plane, and serves the MCP protocol over the selected transport.

mod config;
mod logging;

use std::sync::Arc;

use prow_core::control::{Endpoints, ProwControlPlane};
use prow_core::gateway::HttpGateway;
use prow_mcp::server::{serve_stdio, serve_streamable_http};
use tracing::info;

use crate::config::{ProwConfig, Transport};
use crate::logging::LogConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ProwConfig::from_args()?;
    logging::init(LogConfig {
        json: config.log_json,
        verbose: config.verbose,
    });

    let gateway = HttpGateway::new(config.api_key.as_deref())?;
    if !gateway.is_authenticated() {
        info!("no API key configured; upstream requests are unauthenticated");
    }
    let endpoints = Endpoints::new(&config.prow_url, &config.gcs_url, &config.cluster_api_url);
    info!(prow_url = %endpoints.prow_url, "prow-mcpd starting");
    let control = Arc::new(ProwControlPlane::new(gateway, endpoints));

    match config.transport {
        Transport::Stdio => serve_stdio(control).await,
        Transport::StreamableHttp => {
            serve_streamable_http(control, config.mcp_http_addr).await
        }
    }
}
