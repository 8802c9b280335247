use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::mcp::tools::{
    ExecutionContext, MCPTool, ToolCategory, ToolError, parse_params, to_output,
};
use crate::models::FileContent;

#[derive(Debug, Deserialize)]
pub struct ReadFileParams {
    pub path: String,
}

/// Read file contents tool
pub struct ReadFileTool;

#[async_trait]
impl MCPTool for ReadFileTool {
    fn name(&self) -> &str {
        "read-file"
    }

    fn title(&self) -> &str {
        "Read file"
    }

    fn description(&self) -> &str {
        "Read the full UTF-8 text of a file"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File to read, relative to the base directory"
                }
            },
            "required": ["path"]
        })
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::FileSystem
    }

    async fn execute(&self, params: Value, context: &ExecutionContext) -> Result<Value, ToolError> {
        let params: ReadFileParams = parse_params(params)?;
        let content = context.workspace.read_file(&params.path).await?;
        to_output(&FileContent { content })
    }
}
