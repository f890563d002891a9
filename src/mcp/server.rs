//! MCP tool server implementation.

use super::protocol::*;
use super::transport::Transport;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

const SERVER_NAME: &str = "nyhet-news";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Executes one tool call. Implementations return one text block per item.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: &Value) -> Result<Vec<String>>;
}

/// A tool descriptor bound to its handler.
///
/// The catalog is built once before the server starts and never changes.
pub struct RegisteredTool {
    pub tool: Tool,
    pub handler: Arc<dyn ToolHandler>,
}

/// MCP server exposing a static tool catalog over an in-process transport.
pub struct NewsServer {
    tools: Vec<RegisteredTool>,
}

impl NewsServer {
    /// Create a server from an immutable tool catalog.
    pub fn new(tools: Vec<RegisteredTool>) -> Self {
        Self { tools }
    }

    /// Serve requests until the peer closes the transport.
    ///
    /// Dropping the returned future (e.g. by aborting the task that runs
    /// it) releases the transport, which ends any pending peer reads.
    pub async fn serve(self, mut transport: Transport) -> Result<()> {
        debug!("News MCP server starting");

        while let Some(line) = transport.recv_line().await {
            if line.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    transport.send(&JsonRpcResponse::error(None, -32700, "Parse error"))?;
                    continue;
                }
            };

            if request.is_notification() {
                debug!("Notification: {}", request.method);
                continue;
            }

            let response = self.handle_request(request).await;
            transport.send(&response)?;
        }

        debug!("News MCP server stopping: transport closed");
        Ok(())
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        if let Some(params) = params {
            if let Ok(init) = serde_json::from_value::<InitializeParams>(params) {
                debug!(
                    "Client connected: {} v{}",
                    init.client_info.name, init.client_info.version
                );
            }
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.tools.iter().map(|t| t.tool.clone()).collect(),
        };
        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Handle tools/call request.
    ///
    /// Tool-level failures (unknown name, missing arguments, handler errors)
    /// are reported as error-flagged results, never as transport faults.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        let result = self.call_tool(&params).await;
        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Validate and execute one tool call.
    async fn call_tool(&self, params: &ToolCallParams) -> ToolCallResult {
        let registered = match self.tools.iter().find(|t| t.tool.name == params.name) {
            Some(t) => t,
            None => return ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        let arguments = params.arguments.clone().unwrap_or_else(|| json!({}));

        for required in registered.tool.required_params() {
            if arguments.get(&required).is_none() {
                return ToolCallResult::error(format!(
                    "The '{}' parameter is required.",
                    required
                ));
            }
        }

        match registered.handler.call(&arguments).await {
            Ok(blocks) => ToolCallResult::text_blocks(blocks),
            Err(e) => ToolCallResult::error(format!("Error processing request: {}", e)),
        }
    }
}
