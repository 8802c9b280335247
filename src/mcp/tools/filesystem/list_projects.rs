use async_trait::async_trait;
use serde_json::{Value, json};

use crate::mcp::tools::{ExecutionContext, MCPTool, ToolCategory, ToolError, to_output};
use crate::models::ProjectListing;

/// List the top-level project directories of the base directory
pub struct ListProjectsTool;

#[async_trait]
impl MCPTool for ListProjectsTool {
    fn name(&self) -> &str {
        "list-projects"
    }

    fn title(&self) -> &str {
        "List projects"
    }

    fn description(&self) -> &str {
        "List the top-level directories of the base directory"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::FileSystem
    }

    async fn execute(&self, _params: Value, context: &ExecutionContext) -> Result<Value, ToolError> {
        let projects = context.workspace.list_projects().await?;
        to_output(&ProjectListing { projects })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::test_support::context_for;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_projects_tool() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("site")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let context = context_for(&dir);

        let output = ListProjectsTool.execute(json!({}), &context).await.unwrap();
        assert_eq!(output, json!({"projects": [{"name": "site"}]}));
    }
}
