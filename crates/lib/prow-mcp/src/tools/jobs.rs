use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{ProwMcp, helpers};

/// Parameters for fetching the latest run of a job.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetLatestJobRunParams {
    /// The name of the Prow job to query.
    pub job_name: String,
}

/// Parameters for fetching logs by job id or by namespace.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetJobLogsParams {
    /// Job id (the run's unique name). Used when `namespace` is not set.
    pub job_id: Option<String>,
    /// A `ci-op-*` namespace whose pod logs should be collected.
    pub namespace: Option<String>,
    /// Only collect logs from containers with this name (namespace lookups).
    pub container: Option<String>,
}

/// Parameters for fetching a build log from object storage.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetBuildLogsParams {
    pub job_name: String,
    pub build_id: String,
}

#[tool_router(router = tool_router_jobs, vis = "pub")]
impl ProwMcp {
    #[tool(description = "Get the latest run of a Prow job: job id, state, start and completion times, URL and build id.")]
    async fn get_latest_job_run(
        &self,
        Parameters(params): Parameters<GetLatestJobRunParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let job_name = helpers::required(params.job_name, "job_name")?;
        let summary = self.control().latest_job_run(&job_name).await;
        helpers::tool_result("Failed to fetch job info", summary)
    }

    #[tool(description = "Get logs for a job. With job_id, returns the run's build log and artifacts URL. With namespace, returns container logs for every pod in it, optionally limited to one container.")]
    async fn get_job_logs(
        &self,
        Parameters(params): Parameters<GetJobLogsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let container = helpers::normalize(params.container);
        if let Some(namespace) = helpers::normalize(params.namespace) {
            let logs = self
                .control()
                .pod_logs(&namespace, container.as_deref())
                .await;
            return helpers::tool_result("Failed to fetch pod logs", logs);
        }

        let job_id = helpers::normalize(params.job_id)
            .ok_or_else(|| helpers::invalid_params("job_id or namespace is required"))?;
        let bundle = self.control().job_logs_by_id(&job_id).await;
        helpers::tool_result("Failed to fetch job logs", bundle)
    }

    #[tool(description = "Get the build log and artifacts URL for a job name and build id.")]
    async fn get_build_logs(
        &self,
        Parameters(params): Parameters<GetBuildLogsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let job_name = helpers::required(params.job_name, "job_name")?;
        let build_id = helpers::required(params.build_id, "build_id")?;
        let bundle = self.control().build_logs(&job_name, &build_id).await;
        Ok(CallToolResult::success(vec![Content::json(bundle)?]))
    }
}
