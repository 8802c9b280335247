use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ExecutionContext, MCPTool, ToolCategory, ToolError, parse_params, to_output};

#[derive(Debug, Deserialize)]
pub struct RunCommandParams {
    pub command: String,
    /// Working directory relative to the base directory. Defaults to the base.
    #[serde(default)]
    pub cwd: Option<String>,
}

/// Run a shell command and capture its output
pub struct RunCommandTool;

#[async_trait]
impl MCPTool for RunCommandTool {
    fn name(&self) -> &str {
        "run-command"
    }

    fn title(&self) -> &str {
        "Run command"
    }

    fn description(&self) -> &str {
        "Run a shell command and return its stdout, stderr and exit code"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Command line passed to the system shell"
                },
                "cwd": {
                    "type": "string",
                    "description": "Working directory relative to the base directory",
                    "default": "."
                }
            },
            "required": ["command"]
        })
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Shell
    }

    async fn execute(&self, params: Value, context: &ExecutionContext) -> Result<Value, ToolError> {
        let params: RunCommandParams = parse_params(params)?;
        let cwd = context
            .workspace
            .resolve_directory(params.cwd.as_deref().unwrap_or("."))
            .await?;
        let output = context.commands.run(&params.command, &cwd).await?;
        to_output(&output)
    }
}
