//! Authenticated API client
//!
//! Wraps a single `reqwest::Client` carrying the bearer token and JSON
//! content type as default headers. The client is read-only after
//! construction and can be shared freely between concurrent requests.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::request::ApiRequest;

/// HTTP client for the Featureflow API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// Fails only if the token cannot be encoded as a header value or the
    /// TLS backend cannot be initialised.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token)).map_err(|_| {
            Error::InvalidConfig {
                message: "API token contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Configured base URL (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a request path. The path is appended verbatim.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue a request and decode the response payload.
    ///
    /// Success bodies are parsed as JSON; an empty body decodes to the empty
    /// string and a non-JSON body is returned as a JSON string. Non-success statuses are
    /// mapped through [`Error::from_response`].
    pub async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.url_for(&request.path);
        let mut builder = self.http.request(request.method.into(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query.to_query());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %request.method, path = %request.path, "Sending API request");

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), path = %request.path, "API request failed");
            return Err(Error::from_response(status.as_u16(), &bytes));
        }

        Ok(decode_body(&bytes))
    }
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Params;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let config = ApiConfig::new(format!("{}/api", server.uri()), "test-token");
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn sends_bearer_token_and_json_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/projects"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"key": "acme"}])))
            .expect(1)
            .mount(&server)
            .await;

        let value = client_for(&server)
            .send(&ApiRequest::get("/v1/projects"))
            .await
            .unwrap();

        assert_eq!(value, json!([{"key": "acme"}]));
    }

    #[tokio::test]
    async fn forwards_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/features"))
            .and(query_param("projectKey", "acme"))
            .and(query_param("archived", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let request = ApiRequest::get("/v1/features").query(
            Params::new()
                .with("projectKey", "acme")
                .with("archived", false),
        );
        let value = client_for(&server).send(&request).await.unwrap();
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/projects"))
            .and(body_json(json!({"key": "acme", "name": "Acme"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "p1"})))
            .expect(1)
            .mount(&server)
            .await;

        let request =
            ApiRequest::post("/v1/projects").body(Params::new().with("key", "acme").with("name", "Acme"));
        let value = client_for(&server).send(&request).await.unwrap();
        assert_eq!(value, json!({"id": "p1"}));
    }

    #[tokio::test]
    async fn empty_success_body_decodes_to_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/projects/acme"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let value = client_for(&server)
            .send(&ApiRequest::delete("/v1/projects/acme"))
            .await
            .unwrap();
        assert_eq!(value, json!(""));
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain text"))
            .mount(&server)
            .await;

        let value = client_for(&server)
            .send(&ApiRequest::get("/v1/projects"))
            .await
            .unwrap();
        assert_eq!(value, json!("plain text"));
    }

    #[tokio::test]
    async fn error_status_with_message_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/projects/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Project not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send(&ApiRequest::get("/v1/projects/missing"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, Error::Api { ref message, .. } if message == "Project not found"));
    }

    #[tokio::test]
    async fn error_status_without_body_maps_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send(&ApiRequest::get("/v1/environments"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Status { status: 503 }));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = ApiConfig::new(format!("http://127.0.0.1:{port}/api"), "t")
            .with_timeout(Duration::from_secs(5));
        let client = ApiClient::new(&config).unwrap();

        let err = client
            .send(&ApiRequest::get("/v1/features"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let config = ApiConfig::new(server.uri(), "t").with_timeout(Duration::from_millis(100));
        let client = ApiClient::new(&config).unwrap();

        let err = client.send(&ApiRequest::get("/v1/projects")).await.unwrap_err();
        match err {
            Error::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected transport timeout, got {other:?}"),
        }
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let config = ApiConfig::new("http://localhost", "bad\ntoken");
        let err = ApiClient::new(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn url_for_appends_path_verbatim() {
        let client = ApiClient::new(&ApiConfig::new("http://localhost:8080/api/", "t")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(
            client.url_for("/v1/features/proj:flag"),
            "http://localhost:8080/api/v1/features/proj:flag"
        );
    }

    #[test]
    fn decode_body_keeps_empty_and_blank_bodies_as_text() {
        assert_eq!(decode_body(b""), json!(""));
        assert_eq!(decode_body(b"  \n"), json!("  \n"));
        assert_eq!(decode_body(br#"{"a":1}"#), json!({"a": 1}));
    }
}
