use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::mcp::tools::{
    ExecutionContext, MCPTool, ToolCategory, ToolError, parse_params, to_output,
};

#[derive(Debug, Deserialize)]
pub struct DeletePathParams {
    pub path: String,
}

/// Delete a file or an empty directory
pub struct DeletePathTool;

#[async_trait]
impl MCPTool for DeletePathTool {
    fn name(&self) -> &str {
        "delete-path"
    }

    fn title(&self) -> &str {
        "Delete path"
    }

    fn description(&self) -> &str {
        "Delete a file or an empty directory"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File or empty directory to delete, relative to the base directory"
                }
            },
            "required": ["path"]
        })
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::FileSystem
    }

    async fn execute(&self, params: Value, context: &ExecutionContext) -> Result<Value, ToolError> {
        let params: DeletePathParams = parse_params(params)?;
        let outcome = context.workspace.delete_path(&params.path).await?;
        to_output(&outcome)
    }
}
