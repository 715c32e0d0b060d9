//! FeatureLens MCP Server: feature subgraphs for AI agents.
//!
//! Runs a JSON-RPC 2.0 server over STDIO that exposes feature analysis
//! through the Model Context Protocol (MCP).
//!
//! Usage:
//!   featurelens-mcp [project_root]
//!
//! If no project root is given, uses the current working directory.

use std::path::PathBuf;

use featurelens::config::FeatureLensConfig;
use featurelens::mcp::{McpServer, ToolContext};
use tracing::info;

fn main() {
    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let project_root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let project_root = project_root.canonicalize().unwrap_or(project_root);

    info!(root = %project_root.display(), "FeatureLens MCP server starting");

    let config = FeatureLensConfig::load(&project_root);
    let server = McpServer::new(ToolContext::new(project_root, config));

    info!("MCP server ready, waiting for JSON-RPC requests on stdin");
    server.run_stdio();
}
