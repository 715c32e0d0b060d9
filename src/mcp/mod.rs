//! MCP (Model Context Protocol) server module.
//!
//! Provides a JSON-RPC 2.0 over STDIO interface for AI agents
//! to request feature subgraphs.

pub mod server;
pub mod tools;
pub mod types;

pub use server::McpServer;
pub use tools::ToolContext;
