//! MCP server implementation for prow-mcp.
//!
//! This crate wires the Prow control plane into rmcp tool handlers and
//! exposes the MCP-facing API surface for job, log, and namespace queries.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use prow_core::control::ProwControlPlane;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

const SERVER_INSTRUCTIONS: &str = r"prow-mcp answers read-only questions about Prow CI jobs.

Workflow:
1. `get_latest_job_run` with a `job_name` returns the newest run: `job_id`, `state`, `start`,
   `completion`, `url`, and `build_id`.
2. Logs:
   - `get_build_logs` with `job_name` and `build_id` returns the build log and an `artifacts_url`.
   - `get_job_logs` with `job_id` resolves the run and returns the same shape.
   - `get_job_logs` with `namespace` (and optional `container`) returns container logs keyed by
     pod, then container.
3. Pull requests:
   - `get_job_namespace` with a GitHub `pr_url` returns the `ci-op-*` namespaces of running jobs.
   - `get_test_cluster_info` with a `namespace` returns merged data from its cluster configmaps.

Notes:
- Failed lookups return `{ error }`. A log fetch failure still returns `artifacts_url`.
- Per-container log failures are reported in that container's slot.
- `help` lists commands; `health` returns `ok`.";

/// MCP server wrapper around the control plane and tool routers.
#[derive(Clone)]
pub struct ProwMcp {
    tool_router: ToolRouter<Self>,
    control: Arc<ProwControlPlane>,
}

impl ProwMcp {
    /// Creates a new server owning a control plane.
    #[must_use]
    pub fn new(control: ProwControlPlane) -> Self {
        Self::with_control(Arc::new(control))
    }

    /// Creates a new server using a shared control plane handle.
    #[must_use]
    pub fn with_control(control: Arc<ProwControlPlane>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_jobs()
            + Self::tool_router_cluster()
            + Self::tool_router_context();
        Self {
            tool_router,
            control,
        }
    }

    pub(crate) fn control(&self) -> &ProwControlPlane {
        &self.control
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl ProwMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for ProwMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_server() -> ProwMcp {
        helpers::server_at("http://prow.invalid")
    }

    #[test]
    fn registers_every_tool() {
        let server = build_server();
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "get_build_logs",
                "get_job_logs",
                "get_job_namespace",
                "get_latest_job_run",
                "get_test_cluster_info",
                "health",
                "help",
            ]
        );
    }

    #[test]
    fn advertises_tools_capability() {
        let info = build_server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some_and(|text| text.contains("get_job_namespace")));
    }
}
