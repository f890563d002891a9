//! MCP tool client implementation.

use super::protocol::*;
use super::transport::Transport;
use crate::error::{NyhetError, Result};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Bound on the initialize handshake.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// MCP client speaking JSON-RPC over an in-process transport.
///
/// `connect` must complete before any other operation. After `close`, every
/// operation fails with a closed-client error.
pub struct McpClient {
    info: ClientInfo,
    transport: Option<Transport>,
    next_id: u64,
    server_info: Option<ServerInfo>,
}

impl McpClient {
    /// Create an unconnected client with the given implementation identity.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            info: ClientInfo {
                name: name.to_string(),
                version: version.to_string(),
            },
            transport: None,
            next_id: 1,
            server_info: None,
        }
    }

    /// Perform the initialize handshake over the given transport.
    ///
    /// Fails with a connection error if the server does not answer within
    /// the handshake bound.
    pub async fn connect(&mut self, transport: Transport) -> Result<()> {
        self.transport = Some(transport);

        let params = InitializeParams {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ClientCapabilities::default(),
            client_info: ClientInfo {
                name: self.info.name.clone(),
                version: self.info.version.clone(),
            },
        };

        let handshake = self.request("initialize", Some(serde_json::to_value(&params)?));
        let result = tokio::time::timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS), handshake)
            .await
            .map_err(|_| NyhetError::Connection("initialize handshake timed out".to_string()))?
            .map_err(|e| NyhetError::Connection(format!("initialize failed: {}", e)))?;

        let init: InitializeResult = serde_json::from_value(result)?;
        debug!(
            "Connected to {} v{} (protocol {})",
            init.server_info.name, init.server_info.version, init.protocol_version
        );
        self.server_info = Some(init.server_info);

        // Handshake complete; tell the server so.
        self.transport_ref()?
            .send(&JsonRpcRequest::notification("notifications/initialized"))?;

        Ok(())
    }

    /// List the server's tool catalog.
    pub async fn list_tools(&mut self) -> Result<Vec<Tool>> {
        let result = self.request("tools/list", None).await?;
        let list: ToolsListResult = serde_json::from_value(result)?;
        Ok(list.tools)
    }

    /// Invoke a tool and await its structured result.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<ToolCallResult> {
        let params = json!({ "name": name, "arguments": arguments });
        let result = self.request("tools/call", Some(params)).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Close the client and release its transport handle. Idempotent.
    pub fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
            debug!("MCP client closed");
        }
    }

    /// Server identity learned during the handshake, if connected.
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.server_info.as_ref()
    }

    fn transport_ref(&self) -> Result<&Transport> {
        self.transport.as_ref().ok_or(NyhetError::ClientClosed)
    }

    /// Send one request and suspend until its matching response arrives.
    ///
    /// Interleaved notifications are tolerated and skipped; an end of
    /// stream before the response surfaces as a transport-closed error.
    async fn request(&mut self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;

        self.transport_ref()?
            .send(&JsonRpcRequest::new(id, method, params))?;

        let transport = self.transport.as_mut().ok_or(NyhetError::ClientClosed)?;
        loop {
            let line = transport
                .recv_line()
                .await
                .ok_or(NyhetError::TransportClosed)?;

            let message: JsonRpcMessage = serde_json::from_str(&line)?;

            if message.is_notification() {
                debug!("Skipping notification: {:?}", message.method);
                continue;
            }

            if !message.is_response() || message.id != Some(Value::from(id)) {
                warn!("Unexpected message while awaiting response {}", id);
                continue;
            }

            if let Some(error) = message.error {
                return Err(NyhetError::Protocol(format!(
                    "{} ({})",
                    error.message, error.code
                )));
            }

            return Ok(message.result.unwrap_or(Value::Null));
        }
    }
}
