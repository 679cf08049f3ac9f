//! MCP Server for the Featureflow feature-flag API
//!
//! This crate exposes the Featureflow management API via the Model Context
//! Protocol (MCP), allowing agentic IDEs (like Claude Desktop, Windsurf,
//! Cursor) to manage projects, features, environments, targets, and API keys.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client (Claude/IDE) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ featureflow-mcp (MCP Server) ]
//!        | tools registry -> argument validation -> request shaping
//!        v
//! [ featureflow-api (HTTP client) ]
//!        | (HTTPS, bearer token)
//!        v
//! [ Featureflow API /v1 ]
//! ```
//!
//! Every tool call is a single passthrough request. Success payloads are
//! returned as pretty-printed JSON text; failures are returned as a one-line
//! `Error...` text, never as a protocol error.

pub mod arguments;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use arguments::{ArgValue, Arguments};
pub use error::{Error, Result};
pub use handlers::{Operation, format_error, handle_tool_call};
pub use server::FeatureflowServer;
pub use tools::{ToolContent, ToolDefinition, ToolDescriptor, ToolResult, get_tool_definitions};
