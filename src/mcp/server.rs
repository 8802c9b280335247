/// MCP Server - JSON-RPC dispatch over the tool registry
///
/// One [`MCPServer`] is shared by every adapter: the HTTP `/mcp` endpoint
/// hands it single messages, the stdio mode drives [`MCPServer::serve`].
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::mcp::{
    MCP_PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION,
    errors::{JsonRpcError, MCPError, MCPResult, ProtocolError, TransportError},
    protocol::{
        InitializeParams, InitializeResult, MCPMessage, MCPNotification, MCPRequest,
        ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability,
    },
    tools::{ExecutionContext, ToolError, ToolRegistry, ToolResult},
    transport::MCPTransport,
};

pub struct MCPServer {
    registry: Arc<ToolRegistry>,
    context: ExecutionContext,
}

impl MCPServer {
    pub fn new(registry: Arc<ToolRegistry>, context: ExecutionContext) -> Self {
        Self { registry, context }
    }

    /// Handle one incoming message. Requests always produce a reply;
    /// notifications and stray responses produce none.
    pub async fn handle_message(&self, message: MCPMessage) -> Option<MCPMessage> {
        if message.is_request() {
            let request = message.into_request()?;
            Some(self.handle_request(request).await)
        } else if message.is_notification() {
            if let Some(notification) = message.into_notification() {
                self.handle_notification(notification);
            }
            None
        } else {
            warn!("Ignoring unexpected message without a method");
            None
        }
    }

    /// Reply for a frame that could not be parsed. The id is unknown, so it is null.
    pub fn parse_failure(error: MCPError) -> MCPMessage {
        MCPMessage::error_response(Value::Null, error.into())
    }

    /// Drive a transport until the peer closes it or a restart is requested.
    pub async fn serve(&self, transport: &mut dyn MCPTransport) -> MCPResult<()> {
        info!(
            "Serving MCP over {:?} transport",
            transport.transport_type()
        );
        let restart = self.context.restart.clone();

        loop {
            let received = tokio::select! {
                received = transport.receive() => received,
                _ = restart.requested() => break,
            };

            let reply = match received {
                Ok(message) => self.handle_message(message).await,
                Err(MCPError::Transport(TransportError::Closed)) => {
                    debug!("Peer closed the transport");
                    break;
                }
                Err(e @ MCPError::Transport(_)) => {
                    error!("Transport error: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Rejecting malformed message: {}", e);
                    Some(Self::parse_failure(e))
                }
            };

            if let Some(reply) = reply {
                transport.send(reply).await?;
            }

            if restart.is_requested() {
                break;
            }
        }

        if restart.is_requested() {
            info!("Restart requested, closing {:?} transport", transport.transport_type());
        }
        transport.close().await
    }

    async fn handle_request(&self, request: MCPRequest) -> MCPMessage {
        let start_time = Instant::now();
        let MCPRequest { id, method, params } = request;
        debug!("Handling request {} ({})", method, id);

        let outcome = match method.as_str() {
            "initialize" => self.handle_initialize(params).await,
            "shutdown" => {
                self.context.stats.record_request(&method);
                info!("Client requested shutdown");
                Ok(Value::Null)
            }
            "ping" => Ok(json!({})),
            "tools/list" => self.handle_list_tools().await,
            "tools/call" => self.handle_tool_call(params).await,
            name => {
                if self.registry.contains(name).await {
                    self.handle_direct_call(name, params).await
                } else {
                    Err(ProtocolError::MethodNotFound(method.clone()).into())
                }
            }
        };

        debug!("Request {} finished in {:?}", method, start_time.elapsed());

        match outcome {
            Ok(result) => MCPMessage::response(id, Some(result)),
            Err(e) => {
                let error: JsonRpcError = e.into();
                debug!("Request {} failed with code {}: {}", method, error.code, error.message);
                MCPMessage::error_response(id, error)
            }
        }
    }

    fn handle_notification(&self, notification: MCPNotification) {
        debug!("Received notification: {}", notification.method);
    }

    async fn handle_initialize(&self, params: Option<Value>) -> MCPResult<Value> {
        self.context.stats.record_request("initialize");

        let params: InitializeParams = match params {
            Some(Value::Null) | None => InitializeParams::default(),
            Some(params) => serde_json::from_value(params)
                .map_err(|e| ProtocolError::InvalidParams(e.to_string()))?,
        };
        if let Some(client) = &params.client_info {
            info!(
                "Client connected: {} {} (protocol {})",
                client.name,
                client.version,
                params.protocol_version.as_deref().unwrap_or("unspecified")
            );
        }

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
                tool_definitions: self.registry.list_tools().await,
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            instructions: Some(
                "File management tools. All paths are relative to the server's base directory."
                    .to_string(),
            ),
        };

        Ok(serde_json::to_value(result)?)
    }

    async fn handle_list_tools(&self) -> MCPResult<Value> {
        self.context.stats.record_request("tools/list");
        let tools = self.registry.list_tools().await;
        Ok(json!({ "tools": tools }))
    }

    /// `tools/call`: failures inside a tool come back as an `isError`
    /// result. Unknown tools and bad arguments are protocol errors.
    async fn handle_tool_call(&self, params: Option<Value>) -> MCPResult<Value> {
        let params = params
            .ok_or_else(|| ProtocolError::InvalidParams("Missing parameters".to_string()))?;
        let ToolCallParams { name, arguments } = serde_json::from_value(params)
            .map_err(|e| ProtocolError::InvalidParams(e.to_string()))?;

        let context = self.context.next_execution();
        let arguments = arguments.unwrap_or(Value::Null);

        let result = match self.registry.execute_tool(&name, arguments, &context).await {
            Ok(output) => ToolResult::success(output),
            Err(e @ (ToolError::NotFound(_) | ToolError::InvalidParams(_))) => {
                return Err(e.into());
            }
            Err(e) => ToolResult::failure(&e),
        };

        Ok(serde_json::to_value(result)?)
    }

    /// A method named after a tool runs it with `params` as the arguments
    /// and returns the raw output.
    async fn handle_direct_call(&self, name: &str, params: Option<Value>) -> MCPResult<Value> {
        let context = self.context.next_execution();
        let output = self
            .registry
            .execute_tool(name, params.unwrap_or(Value::Null), &context)
            .await?;
        Ok(output)
    }
}
