use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::mcp::tools::{
    ExecutionContext, MCPTool, ToolCategory, ToolError, parse_params, to_output,
};

#[derive(Debug, Deserialize)]
pub struct WriteFileParams {
    pub path: String,
    pub content: String,
}

/// Write file contents tool
pub struct WriteFileTool;

#[async_trait]
impl MCPTool for WriteFileTool {
    fn name(&self) -> &str {
        "write-file"
    }

    fn title(&self) -> &str {
        "Write file"
    }

    fn description(&self) -> &str {
        "Create or overwrite a file with the given text. The parent directory must already exist."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File to write, relative to the base directory"
                },
                "content": {
                    "type": "string",
                    "description": "Text to write"
                }
            },
            "required": ["path", "content"]
        })
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::FileSystem
    }

    async fn execute(&self, params: Value, context: &ExecutionContext) -> Result<Value, ToolError> {
        let params: WriteFileParams = parse_params(params)?;
        let outcome = context
            .workspace
            .write_file(&params.path, &params.content)
            .await?;
        to_output(&outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::filesystem::ReadFileTool;
    use crate::mcp::tools::test_support::context_for;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let context = context_for(&dir);

        let output = WriteFileTool
            .execute(json!({"path": "notes.md", "content": "# title"}), &context)
            .await
            .unwrap();
        assert_eq!(output, json!({"path": "notes.md", "bytesWritten": 7}));

        let output = ReadFileTool
            .execute(json!({"path": "notes.md"}), &context)
            .await
            .unwrap();
        assert_eq!(output["content"], "# title");
    }

    #[tokio::test]
    async fn test_write_outside_base_is_rejected() {
        let dir = TempDir::new().unwrap();
        let context = context_for(&dir);

        let err = WriteFileTool
            .execute(json!({"path": "../escape.txt", "content": "x"}), &context)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::models::ErrorKind::OutsideRoot);
    }
}
