use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::ProwMcp;

/// Payload listing the MCP commands.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "help - List the MCP commands this server provides.".to_string(),
                "health - Health check, returns 'ok'.".to_string(),
                "get_latest_job_run - Latest run of a Prow job by job name.".to_string(),
                "get_job_logs - Build log for a job id, or pod logs for a ci-op namespace."
                    .to_string(),
                "get_build_logs - Build log and artifacts URL for a job name and build id."
                    .to_string(),
                "get_job_namespace - ci-op namespaces of the running jobs for a pull request URL."
                    .to_string(),
                "get_test_cluster_info - Cluster metadata from a namespace's cluster configmaps."
                    .to_string(),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl ProwMcp {
    #[tool(description = "List the MCP commands this server provides.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }
}
