//! MCP Server implementation
//!
//! Reads newline-delimited JSON-RPC messages, routes them, and writes one
//! response line per request. Each request is handled on its own task so a
//! slow API call never blocks the next message; responses funnel through a
//! single writer task so output lines never interleave.

use std::sync::Arc;

use featureflow_api::{ApiClient, ApiConfig};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::handlers::handle_tool_call;
use crate::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, InitializeParams, InitializeResult,
    JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability,
};
use crate::tools::{ToolDefinition, ToolResult, get_tool_definitions};
use crate::{Error, Result};

/// MCP Server for the Featureflow API
///
/// Holds only read-only state (the tool list and the API client), so one
/// instance can serve concurrent requests through an `Arc`.
///
/// # Example
///
/// ```ignore
/// use featureflow_api::ApiConfig;
/// use featureflow_mcp::FeatureflowServer;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = FeatureflowServer::new(&ApiConfig::default())?;
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct FeatureflowServer {
    client: ApiClient,
    tools: Vec<ToolDefinition>,
}

impl FeatureflowServer {
    /// Create a server from API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self::with_client(ApiClient::new(config)?))
    }

    /// Create a server around an existing client.
    pub fn with_client(client: ApiClient) -> Self {
        Self {
            client,
            tools: get_tool_definitions(),
        }
    }

    /// Run the MCP server on stdin/stdout until stdin closes.
    pub async fn run(self) -> Result<()> {
        tracing::info!(api_url = %self.client.base_url(), "MCP server ready, listening on stdio");
        Arc::new(self)
            .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve messages from `reader`, writing responses to `writer`.
    ///
    /// Returns once the reader reaches EOF and every in-flight request has
    /// written its response. Undecodable lines are answered with a parse
    /// error; only a failure of the underlying stream ends the loop early.
    pub async fn serve<R, W>(self: Arc<Self>, mut reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let mut buf = Vec::new();
        while reader.read_until(b'\n', &mut buf).await? > 0 {
            let line = match String::from_utf8(std::mem::take(&mut buf)) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "Received message that is not valid UTF-8");
                    if let Some(response) = error_response(PARSE_ERROR, format!("Parse error: {}", e)) {
                        let _ = tx.send(response);
                    }
                    continue;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            tracing::debug!(request = %line, "Received message");

            let line = line.to_string();
            let server = Arc::clone(&self);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.respond(&line).await {
                    // The writer only goes away on an IO error it already reported.
                    let _ = tx.send(response);
                }
            });
        }

        tracing::info!("stdin closed, draining in-flight requests");
        drop(tx);
        writer_task
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }

    /// Handle one raw line, mapping failures to JSON-RPC error responses.
    async fn respond(&self, line: &str) -> Option<String> {
        match self.handle_message(line).await {
            Ok(response) if !response.is_empty() => Some(response),
            Ok(_) => None, // No response needed (notifications)
            Err(e) => {
                tracing::warn!(error = %e, "Failed to handle message");
                match &e {
                    Error::Json(_) => error_response(PARSE_ERROR, format!("Parse error: {}", e)),
                    _ => error_response(INTERNAL_ERROR, format!("Internal error: {}", e)),
                }
            }
        }
    }

    /// Handle a single MCP message
    ///
    /// Parses the JSON-RPC request and dispatches to the appropriate handler.
    ///
    /// # Returns
    ///
    /// The JSON-RPC response as a string, or empty string for notifications.
    /// Malformed JSON is returned as `Err`.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let value: Value = serde_json::from_str(message)?;
        let id = value.get("id").filter(|id| !id.is_null()).cloned();

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                let response =
                    JsonRpcResponse::error(id, INVALID_REQUEST, format!("Invalid Request: {}", e));
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        if request.is_notification() {
            tracing::debug!(method = %request.method, "Received notification");
            return Ok(String::new());
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params)?,
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id)?,
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    /// Handle the initialize request
    ///
    /// Returns server capabilities and info.
    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: InitializeParams = serde_json::from_value(params).unwrap_or_default();
        if let Some(client) = &params.client_info {
            tracing::info!(client = %client.name, version = %client.version, "Client connected");
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "featureflow-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        Ok(JsonRpcResponse::success(
            id,
            json!({ "tools": serde_json::to_value(&self.tools)? }),
        ))
    }

    /// Handle tools/call request
    ///
    /// Tool failures are reported inside the text result; only unusable
    /// params produce a JSON-RPC error.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        let text = handle_tool_call(&self.client, &tool_params.name, tool_params.arguments).await;
        let tool_result = ToolResult::text(text);
        Ok(JsonRpcResponse::success(id, serde_json::to_value(tool_result)?))
    }

    /// Get available tools
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Get the API client
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

/// Serialized error response for a message whose id is unknown.
fn error_response(code: i32, message: String) -> Option<String> {
    serde_json::to_string(&JsonRpcResponse::error(None, code, message)).ok()
}

async fn write_responses<W>(mut rx: mpsc::UnboundedReceiver<String>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
