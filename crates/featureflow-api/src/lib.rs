//! HTTP client for the Featureflow management API
//!
//! This crate is the outbound half of the Featureflow MCP server. It owns the
//! process-wide HTTP configuration (base URL, bearer token, timeout) and turns
//! an [`ApiRequest`] into a single authenticated call, returning the decoded
//! JSON payload or a typed [`Error`].
//!
//! ```text
//! [ featureflow-mcp (dispatcher) ]
//!        | ApiRequest { method, path, query, body }
//!        v
//! [ featureflow-api (ApiClient) ]
//!        | HTTPS, Authorization: Bearer <token>
//!        v
//! [ Featureflow API /v1/... ]
//! ```
//!
//! The client performs no retries and no caching: every request is one
//! best-effort passthrough.

pub mod client;
pub mod config;
pub mod error;
pub mod request;

pub use client::ApiClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use request::{ApiRequest, Method, Params};
