use prow_core::control::{ControlError, JobNamespace};
use prow_core::parsers::{ParseError, PullRequestRef};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{ProwMcp, helpers};

/// Parameters for looking up the namespaces of a pull request's running jobs.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetJobNamespaceParams {
    /// GitHub pull request URL, e.g. `https://github.com/org/repo/pull/123`.
    pub pr_url: String,
}

/// Parameters for reading cluster metadata from a namespace.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetTestClusterInfoParams {
    pub namespace: String,
}

/// Running jobs and their namespaces for one pull request.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestNamespaces {
    pub org: String,
    pub repo: String,
    pub pr_number: u64,
    pub jobs: Vec<JobNamespace>,
}

#[tool_router(router = tool_router_cluster, vis = "pub")]
impl ProwMcp {
    #[tool(description = "Find the ci-op namespaces of the running jobs triggered by a GitHub pull request URL.")]
    async fn get_job_namespace(
        &self,
        Parameters(params): Parameters<GetJobNamespaceParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let pr: PullRequestRef = params
            .pr_url
            .parse()
            .map_err(|err: ParseError| helpers::invalid_params(err.to_string()))?;

        let namespaces = self
            .control()
            .running_namespaces_for_pr(&pr)
            .await
            .and_then(|jobs| {
                if jobs.is_empty() {
                    return Err(ControlError::NotFound(format!(
                        "No running jobs with a ci-op namespace found for {pr}"
                    )));
                }
                Ok(PullRequestNamespaces {
                    org: pr.org.clone(),
                    repo: pr.repo.clone(),
                    pr_number: pr.number,
                    jobs,
                })
            });
        helpers::tool_result("Failed to fetch job namespace", namespaces)
    }

    #[tool(description = "Read test cluster metadata from the configmaps in a job namespace whose names contain 'cluster'.")]
    async fn get_test_cluster_info(
        &self,
        Parameters(params): Parameters<GetTestClusterInfoParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let namespace = helpers::required(params.namespace, "namespace")?;
        let info = self
            .control()
            .cluster_info(&namespace)
            .await
            .and_then(|info| {
                if info.is_empty() {
                    return Err(ControlError::NotFound(format!(
                        "No cluster configmaps found in namespace {namespace}"
                    )));
                }
                Ok(info)
            });
        helpers::tool_result("Failed to fetch cluster info", info)
    }
}
