//! Error types for the MCP server

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the Featureflow API client
    #[error(transparent)]
    Api(#[from] featureflow_api::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tool arguments are not an object
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// A single argument has the wrong type or value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required argument was not supplied
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// IO error on the stdio transport
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
