//! Error types for the Featureflow API client

use serde_json::Value;
use thiserror::Error;

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the Featureflow API
#[derive(Debug, Error)]
pub enum Error {
    /// Non-success status with a `message` or `title` in the response body
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Non-success status without a structured body
    #[error("Request failed with status code {status}")]
    Status { status: u16 },

    /// Connection, DNS, TLS, or timeout failure
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Configuration that cannot be turned into a client
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    /// Build the error for a non-success response.
    ///
    /// Prefers the body's `message` field, then `title` (problem+json), and
    /// falls back to a bare status error when neither is usable.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: Option<Value> = serde_json::from_slice(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|v| field_text(v, "message").or_else(|| field_text(v, "title")));

        match message {
            Some(message) => Error::Api { status, message },
            None => Error::Status { status },
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::Status { status } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            Error::InvalidConfig { .. } => None,
        }
    }
}

fn field_text(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
