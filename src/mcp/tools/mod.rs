/// MCP Tools module - tool trait, execution context and results
///
/// Every operation the service exposes is an [`MCPTool`] registered in the
/// [`ToolRegistry`]. Both the HTTP `/mcp` endpoint and the stdio transport
/// dispatch through the same registry.
pub mod command;
pub mod filesystem;
pub mod lifecycle;
pub mod registry;

// Re-export core tool types
pub use self::registry::ToolRegistry;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::command::{CommandError, CommandRunner};
use crate::lifecycle::RestartSignal;
use crate::models::{ErrorBody, ErrorKind, ErrorPayload};
use crate::stats::StatsRecorder;
use crate::workspace::{Workspace, WorkspaceError};

/// Core trait that all MCP tools must implement
#[async_trait]
pub trait MCPTool: Send + Sync {
    /// Unique tool name, as clients call it
    fn name(&self) -> &str;

    /// Short human-readable title
    fn title(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments object
    fn input_schema(&self) -> Value;

    /// Run the tool. `params` has already been validated against
    /// [`MCPTool::input_schema`].
    async fn execute(&self, params: Value, context: &ExecutionContext) -> Result<Value, ToolError>;

    fn category(&self) -> ToolCategory {
        ToolCategory::General
    }
}

/// Tool categories for organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolCategory {
    General,
    FileSystem,
    Shell,
    Lifecycle,
}

/// Everything a tool may touch. Cheap to clone; each call gets its own
/// execution id for log correlation.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub execution_id: String,
    pub workspace: Arc<Workspace>,
    pub commands: Arc<CommandRunner>,
    pub restart: RestartSignal,
    pub stats: Arc<StatsRecorder>,
}

impl ExecutionContext {
    pub fn new(
        workspace: Arc<Workspace>,
        commands: Arc<CommandRunner>,
        restart: RestartSignal,
        stats: Arc<StatsRecorder>,
    ) -> Self {
        Self {
            execution_id: Uuid::new_v4().to_string(),
            workspace,
            commands,
            restart,
            stats,
        }
    }

    /// Same services, fresh execution id
    pub fn next_execution(&self) -> Self {
        Self {
            execution_id: Uuid::new_v4().to_string(),
            ..self.clone()
        }
    }
}

/// Tool error types
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::UnknownTool,
            Self::InvalidParams(_) => ErrorKind::InvalidParams,
            Self::Workspace(e) => e.kind(),
            Self::Command(e) => e.kind(),
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Content blocks of a `tools/call` result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

/// Result of `tools/call`. Domain failures are reported here with
/// `isError: true` rather than as JSON-RPC errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<Content>,
    pub structured_content: Value,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(output: Value) -> Self {
        let text = serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string());
        Self {
            content: vec![Content::Text { text }],
            structured_content: output,
            is_error: false,
        }
    }

    pub fn failure(error: &ToolError) -> Self {
        let payload = error.payload();
        let text = payload.message.clone();
        let body = ErrorBody { error: payload };
        Self {
            content: vec![Content::Text { text }],
            structured_content: serde_json::to_value(body).unwrap_or(Value::Null),
            is_error: true,
        }
    }
}

/// Deserialize validated arguments into a tool's typed parameter struct.
/// Missing arguments are treated as an empty object.
pub fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, ToolError> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParams(e.to_string()))
}

/// Serialize a tool's typed output
pub fn to_output<T: Serialize>(output: &T) -> Result<Value, ToolError> {
    serde_json::to_value(output).map_err(|e| ToolError::Internal(e.to_string()))
}
