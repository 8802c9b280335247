use crate::mcp::errors::{JsonRpcError, MCPError, MCPResult, ProtocolError};
use crate::mcp::tools::registry::ToolInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// JSON-RPC 2.0 message structure for MCP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MCPMessage {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// Request message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MCPRequest {
    pub id: Value,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Notification message structure (no id, no response expected)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MCPNotification {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl MCPMessage {
    pub const JSONRPC_VERSION: &'static str = "2.0";

    /// Create a new request message with a random id
    pub fn request(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Self::JSONRPC_VERSION.to_string(),
            id: Some(Value::String(Uuid::new_v4().to_string())),
            method: Some(method.into()),
            params,
            result: None,
            error: None,
        }
    }

    /// Create a new response message. A `None` result is sent as `null`.
    pub fn response(id: Value, result: Option<Value>) -> Self {
        Self {
            jsonrpc: Self::JSONRPC_VERSION.to_string(),
            id: Some(id),
            method: None,
            params: None,
            result: Some(result.unwrap_or(Value::Null)),
            error: None,
        }
    }

    /// Create a new error response message
    pub fn error_response(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: Self::JSONRPC_VERSION.to_string(),
            id: Some(id),
            method: None,
            params: None,
            result: None,
            error: Some(error),
        }
    }

    /// Create a new notification message
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Self::JSONRPC_VERSION.to_string(),
            id: None,
            method: Some(method.into()),
            params,
            result: None,
            error: None,
        }
    }

    pub fn is_request(&self) -> bool {
        self.method.is_some() && self.id.is_some()
    }

    pub fn is_response(&self) -> bool {
        self.id.is_some()
            && self.method.is_none()
            && (self.result.is_some() || self.error.is_some())
    }

    pub fn is_notification(&self) -> bool {
        self.method.is_some() && self.id.is_none()
    }

    /// Validate the message structure
    pub fn validate(&self) -> MCPResult<()> {
        if self.jsonrpc != Self::JSONRPC_VERSION {
            return Err(MCPError::Protocol(ProtocolError::InvalidMessage(format!(
                "Invalid JSON-RPC version: {}",
                self.jsonrpc
            ))));
        }

        if self.is_request() || self.is_notification() {
            if self.result.is_some() || self.error.is_some() {
                return Err(MCPError::Protocol(ProtocolError::InvalidMessage(
                    "Request message cannot have result or error fields".to_string(),
                )));
            }
        } else if self.is_response() {
            if self.params.is_some() {
                return Err(MCPError::Protocol(ProtocolError::InvalidMessage(
                    "Response message cannot have params".to_string(),
                )));
            }
            if self.result.is_some() && self.error.is_some() {
                return Err(MCPError::Protocol(ProtocolError::InvalidMessage(
                    "Response cannot have both result and error".to_string(),
                )));
            }
        } else {
            return Err(MCPError::Protocol(ProtocolError::InvalidMessage(
                "Message does not match any valid type (request, response, notification)"
                    .to_string(),
            )));
        }

        Ok(())
    }

    /// Split into a typed request, if this is one
    pub fn into_request(self) -> Option<MCPRequest> {
        match (self.id, self.method) {
            (Some(id), Some(method)) => Some(MCPRequest {
                id,
                method,
                params: self.params,
            }),
            _ => None,
        }
    }

    /// Split into a typed notification, if this is one
    pub fn into_notification(self) -> Option<MCPNotification> {
        match (self.id, self.method) {
            (None, Some(method)) => Some(MCPNotification {
                method,
                params: self.params,
            }),
            _ => None,
        }
    }
}

/// Parameters of `initialize`. Everything is optional so that minimal
/// clients can still connect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion", default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub capabilities: Value,
    #[serde(rename = "clientInfo", default)]
    pub client_info: Option<ClientInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsCapability {
    #[serde(rename = "listChanged", default)]
    pub list_changed: bool,
}

/// Server capabilities. `toolDefinitions` lets clients that skip
/// `tools/list` see every tool right after `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
    #[serde(rename = "toolDefinitions", default)]
    pub tool_definitions: Vec<ToolInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Parameters of `tools/call`
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Protocol message parser
pub struct MessageParser;

impl MessageParser {
    /// Parse a message from JSON bytes
    pub fn parse_message(data: &[u8]) -> MCPResult<MCPMessage> {
        let message: MCPMessage = serde_json::from_slice(data)
            .map_err(|e| MCPError::Protocol(ProtocolError::ParseError(e.to_string())))?;

        message.validate()?;
        Ok(message)
    }

    /// Serialize a message to JSON bytes
    pub fn serialize_message(message: &MCPMessage) -> MCPResult<Vec<u8>> {
        message.validate()?;
        serde_json::to_vec(message)
            .map_err(|e| MCPError::Protocol(ProtocolError::InternalError(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_message() {
        let msg = MCPMessage::request("tools/list", Some(json!({})));
        assert!(msg.is_request());
        assert!(!msg.is_response());
        assert!(!msg.is_notification());
        assert!(msg.validate().is_ok());
    }

    #[test]
    fn test_null_result_response_is_valid() {
        let msg = MCPMessage::response(json!(7), None);
        assert!(msg.is_response());
        assert!(msg.validate().is_ok());

        let encoded = serde_json::to_value(&msg).unwrap();
        assert_eq!(encoded, json!({"jsonrpc": "2.0", "id": 7, "result": null}));
    }

    #[test]
    fn test_notification_message() {
        let msg = MCPMessage::notification("notifications/initialized", None);
        assert!(msg.is_notification());
        assert!(msg.validate().is_ok());
        assert!(msg.into_notification().is_some());
    }

    #[test]
    fn test_invalid_message() {
        let mut msg = MCPMessage::request("initialize", None);
        msg.result = Some(json!("invalid"));
        assert!(msg.validate().is_err());

        let mut msg = MCPMessage::request("initialize", None);
        msg.jsonrpc = "1.0".to_string();
        assert!(msg.validate().is_err());
    }

    #[test]
    fn test_message_parsing() {
        let data = br#"{"jsonrpc":"2.0","id":1,"method":"list-files","params":{"path":"."}}"#;
        let message = MessageParser::parse_message(data).unwrap();

        let request = message.into_request().unwrap();
        assert_eq!(request.id, json!(1));
        assert_eq!(request.method, "list-files");
        assert_eq!(request.params, Some(json!({"path": "."})));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = MessageParser::parse_message(b"{not json").unwrap_err();
        assert!(matches!(err, MCPError::Protocol(ProtocolError::ParseError(_))));
    }

    #[test]
    fn test_initialize_params_are_lenient() {
        let params: InitializeParams = serde_json::from_value(json!({})).unwrap();
        assert!(params.protocol_version.is_none());
        assert!(params.client_info.is_none());
    }
}
