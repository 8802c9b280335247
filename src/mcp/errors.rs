use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mcp::tools::ToolError;
use crate::models::ErrorPayload;

/// Error handling for the MCP layer
pub type MCPResult<T> = Result<T, MCPError>;

/// Main error type for all MCP operations
#[derive(Debug, thiserror::Error)]
pub enum MCPError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Tool execution error: {0}")]
    ToolExecution(#[from] ToolError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Transport layer errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),

    #[error("Transport closed")]
    Closed,
}

/// Protocol-level errors
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Invalid JSON-RPC message: {0}")]
    InvalidMessage(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy)]
pub enum JsonRpcErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
    ServerError = -32000, // tool reached and failed; `data` carries the error kind
}

/// JSON-RPC error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: JsonRpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<MCPError> for JsonRpcError {
    fn from(error: MCPError) -> Self {
        match error {
            MCPError::Protocol(ProtocolError::MethodNotFound(msg)) => {
                JsonRpcError::new(JsonRpcErrorCode::MethodNotFound, format!("Method not found: {}", msg))
            }
            MCPError::Protocol(ProtocolError::InvalidParams(msg)) => {
                JsonRpcError::new(JsonRpcErrorCode::InvalidParams, msg)
            }
            MCPError::Protocol(ProtocolError::ParseError(msg)) => {
                JsonRpcError::new(JsonRpcErrorCode::ParseError, msg)
            }
            MCPError::Protocol(ProtocolError::InvalidMessage(msg)) => {
                JsonRpcError::new(JsonRpcErrorCode::InvalidRequest, msg)
            }
            MCPError::Validation(msg) => JsonRpcError::new(JsonRpcErrorCode::InvalidParams, msg),
            MCPError::ToolExecution(tool_error) => tool_error.into(),
            _ => JsonRpcError::new(JsonRpcErrorCode::InternalError, error.to_string()),
        }
    }
}

impl From<ProtocolError> for JsonRpcError {
    fn from(error: ProtocolError) -> Self {
        MCPError::Protocol(error).into()
    }
}

impl From<ToolError> for JsonRpcError {
    fn from(error: ToolError) -> Self {
        let code = match &error {
            ToolError::NotFound(_) | ToolError::InvalidParams(_) => JsonRpcErrorCode::InvalidParams,
            ToolError::Internal(_) => JsonRpcErrorCode::InternalError,
            _ => JsonRpcErrorCode::ServerError,
        };
        let payload: ErrorPayload = error.payload();
        let data = serde_json::to_value(&payload).unwrap_or(Value::Null);
        JsonRpcError::new(code, payload.message).with_data(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::WorkspaceError;

    #[test]
    fn test_method_not_found_code() {
        let error: JsonRpcError = ProtocolError::MethodNotFound("bogus".to_string()).into();
        assert_eq!(error.code, -32601);
        assert!(error.message.contains("bogus"));
    }

    #[test]
    fn test_tool_error_carries_kind_in_data() {
        let error: JsonRpcError =
            ToolError::Workspace(WorkspaceError::NotFound("a.txt".to_string())).into();

        assert_eq!(error.code, -32000);
        let data = error.data.unwrap();
        assert_eq!(data["kind"], "not_found");
    }

    #[test]
    fn test_invalid_params_code() {
        let error: JsonRpcError = ToolError::InvalidParams("path is required".to_string()).into();
        assert_eq!(error.code, -32602);
        assert_eq!(error.data.unwrap()["kind"], "invalid_params");
    }
}
