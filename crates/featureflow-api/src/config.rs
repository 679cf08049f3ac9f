//! Process-wide API configuration
//!
//! Resolved once at startup (see the `featureflow-mcp` binary for the
//! CLI/environment layer) and never changed afterwards.

use std::fmt;
use std::time::Duration;

/// Base URL used when `FEATUREFLOW_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Fixed per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the Featureflow API.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `https://app.featureflow.io/api`
    pub base_url: String,
    /// Bearer token; empty when none is configured
    pub token: String,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a configuration with the default timeout.
    ///
    /// Trailing slashes are stripped from `base_url` so request paths
    /// (which always start with `/v1`) can be appended directly.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout (builder pattern).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a non-empty token is configured.
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, "")
    }
}

// Keeps the token out of logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &if self.has_token() { "<redacted>" } else { "<unset>" })
            .field("timeout", &self.timeout)
            .finish()
    }
}
