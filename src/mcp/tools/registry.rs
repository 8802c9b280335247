use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::mcp::errors::{MCPError, MCPResult};
use crate::mcp::tools::{ExecutionContext, MCPTool, ToolCategory, ToolError};

/// Tool information for MCP client discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

struct RegisteredTool {
    tool: Arc<dyn MCPTool>,
    schema: Arc<JSONSchema>,
    category: ToolCategory,
}

#[derive(Default)]
struct Tools {
    // Registration order, used for listing
    order: Vec<String>,
    by_name: HashMap<String, RegisteredTool>,
}

/// Tool registry for managing and executing MCP tools
pub struct ToolRegistry {
    tools: RwLock<Tools>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(Tools::default()),
        }
    }

    /// Register a new tool. Names must be unique and the input schema must
    /// compile.
    pub async fn register_tool(&self, tool: Box<dyn MCPTool>) -> MCPResult<()> {
        let name = tool.name().to_string();
        if name.is_empty() {
            return Err(MCPError::Validation("Tool name cannot be empty".to_string()));
        }

        let schema_value = tool.input_schema();
        if !schema_value.is_object() {
            return Err(MCPError::Validation(format!(
                "Input schema of '{}' must be a JSON object",
                name
            )));
        }
        let schema = JSONSchema::compile(&schema_value).map_err(|e| {
            MCPError::Validation(format!("Invalid input schema for '{}': {}", name, e))
        })?;

        let mut tools = self.tools.write().await;
        if tools.by_name.contains_key(&name) {
            return Err(MCPError::Validation(format!(
                "Tool '{}' is already registered",
                name
            )));
        }

        let category = tool.category();
        tools.order.push(name.clone());
        tools.by_name.insert(
            name.clone(),
            RegisteredTool {
                tool: Arc::from(tool),
                schema: Arc::new(schema),
                category,
            },
        );

        debug!("Registered tool: {} ({:?})", name, category);
        Ok(())
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.tools.read().await.by_name.contains_key(name)
    }

    /// List all available tools in registration order
    pub async fn list_tools(&self) -> Vec<ToolInfo> {
        let tools = self.tools.read().await;
        tools
            .order
            .iter()
            .filter_map(|name| tools.by_name.get(name))
            .map(|entry| ToolInfo {
                name: entry.tool.name().to_string(),
                title: entry.tool.title().to_string(),
                description: entry.tool.description().to_string(),
                input_schema: entry.tool.input_schema(),
            })
            .collect()
    }

    pub async fn tools_in_category(&self, category: ToolCategory) -> Vec<String> {
        let tools = self.tools.read().await;
        tools
            .order
            .iter()
            .filter(|name| {
                tools
                    .by_name
                    .get(*name)
                    .is_some_and(|entry| entry.category == category)
            })
            .cloned()
            .collect()
    }

    /// Execute a tool by name.
    ///
    /// The call is counted in the stats as soon as the tool is found, whether
    /// or not it then succeeds. Arguments are checked against the tool's
    /// schema before the tool sees them.
    pub async fn execute_tool(
        &self,
        name: &str,
        params: Value,
        context: &ExecutionContext,
    ) -> Result<Value, ToolError> {
        let (tool, schema) = {
            let tools = self.tools.read().await;
            let entry = tools
                .by_name
                .get(name)
                .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
            (entry.tool.clone(), entry.schema.clone())
        };

        context.stats.record_tool_call(name);

        let params = if params.is_null() {
            Value::Object(Default::default())
        } else {
            params
        };
        validate_params(&schema, &params)?;

        let start_time = Instant::now();
        debug!("Executing tool: {} with ID: {}", name, context.execution_id);

        let result = tool.execute(params, context).await;
        match &result {
            Ok(_) => info!(
                "Tool {} ({}) completed in {:?}",
                name,
                context.execution_id,
                start_time.elapsed()
            ),
            Err(e) => warn!(
                "Tool {} ({}) failed after {:?}: {}",
                name,
                context.execution_id,
                start_time.elapsed(),
                e
            ),
        }

        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_params(schema: &JSONSchema, params: &Value) -> Result<(), ToolError> {
    schema.validate(params).map_err(|errors| {
        let messages: Vec<String> = errors
            .map(|error| {
                let location = error.instance_path.to_string();
                if location.is_empty() {
                    error.to_string()
                } else {
                    format!("{}: {}", location, error)
                }
            })
            .collect();
        ToolError::InvalidParams(messages.join("; "))
    })
}
