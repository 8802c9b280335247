use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::default_path;
use crate::mcp::tools::{
    ExecutionContext, MCPTool, ToolCategory, ToolError, parse_params, to_output,
};

pub const DEFAULT_MAX_DEPTH: usize = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesParams {
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default = "default_max_depth", alias = "max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// List directory contents tool
pub struct ListFilesTool;

#[async_trait]
impl MCPTool for ListFilesTool {
    fn name(&self) -> &str {
        "list-files"
    }

    fn title(&self) -> &str {
        "List files"
    }

    fn description(&self) -> &str {
        "List the files and directories under a path relative to the base directory"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory to list, relative to the base directory",
                    "default": "."
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Descend into subdirectories",
                    "default": false
                },
                "maxDepth": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Deepest level to descend to when recursive (alias max_depth, not both)",
                    "default": DEFAULT_MAX_DEPTH
                }
            },
            "not": { "required": ["maxDepth", "max_depth"] }
        })
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::FileSystem
    }

    async fn execute(&self, params: Value, context: &ExecutionContext) -> Result<Value, ToolError> {
        let params: ListFilesParams = parse_params(params)?;
        let listing = context
            .workspace
            .list_files(&params.path, params.recursive, params.max_depth)
            .await?;
        to_output(&listing)
    }
}
