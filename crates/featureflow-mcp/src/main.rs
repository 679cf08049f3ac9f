//! Featureflow MCP Server
//!
//! A Model Context Protocol server that exposes the Featureflow feature-flag
//! API to agentic IDEs like Claude Desktop, Windsurf, and Cursor.
//!
//! # Usage
//!
//! ```bash
//! featureflow-mcp [--api-url <url>] [--timeout-secs <n>]
//! ```
//!
//! # Environment Variables
//!
//! - `FEATUREFLOW_API_URL`: API base URL (default: `http://localhost:8080/api`)
//! - `FEATUREFLOW_API_TOKEN`: Bearer token sent with every request
//! - `RUST_LOG`: Control log verbosity (default: `featureflow_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::time::Duration;

use clap::Parser;
use featureflow_api::{ApiConfig, DEFAULT_BASE_URL};
use featureflow_mcp::FeatureflowServer;

/// MCP server for the Featureflow API
#[derive(Parser)]
#[command(name = "featureflow-mcp")]
#[command(about = "MCP server for the Featureflow feature-flag API")]
#[command(version)]
struct Args {
    /// Featureflow API base URL
    #[arg(long, env = "FEATUREFLOW_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Bearer token for the Featureflow API
    #[arg(long, env = "FEATUREFLOW_API_TOKEN", default_value = "", hide_env_values = true, hide = true)]
    api_token: String,

    /// Per-request timeout in seconds (at least 1)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("featureflow_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = ApiConfig::new(&args.api_url, &args.api_token)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    if !config.has_token() {
        tracing::warn!("FEATUREFLOW_API_TOKEN is not set; requests will be sent without credentials");
    }
    tracing::info!(api_url = %config.base_url, "Starting featureflow-mcp server");

    let server = FeatureflowServer::new(&config).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to create API client");
    })?;
    server.run().await.inspect_err(|e| {
        tracing::error!(error = %e, "Server stopped with an error");
    })?;

    Ok(())
}
