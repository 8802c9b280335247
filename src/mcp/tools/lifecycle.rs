use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::warn;

use super::{ExecutionContext, MCPTool, ToolCategory, ToolError};
use crate::lifecycle::RESTART_EXIT_CODE;

/// Ask the server to shut down so its supervisor can start it again.
///
/// The response is produced before the shutdown begins; the listener stops
/// once in-flight requests have drained.
pub struct RebootServerTool;

#[async_trait]
impl MCPTool for RebootServerTool {
    fn name(&self) -> &str {
        "reboot-server"
    }

    fn title(&self) -> &str {
        "Reboot server"
    }

    fn description(&self) -> &str {
        "Stop the server and exit with a restart code so a supervisor starts it again"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Lifecycle
    }

    async fn execute(&self, _params: Value, context: &ExecutionContext) -> Result<Value, ToolError> {
        warn!(
            "Restart requested (execution {}), exiting with code {}",
            context.execution_id, RESTART_EXIT_CODE
        );
        context.stats.mark_restarting();
        context.restart.request();

        Ok(json!({
            "status": "rebooting",
            "exitCode": RESTART_EXIT_CODE,
        }))
    }
}
