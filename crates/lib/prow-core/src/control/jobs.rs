use prow_model::schema::{
    QUERY_ORG,
    QUERY_PULL,
    QUERY_REPO,
    QUERY_STATE,
    make_prowjobs_query_url,
    make_prowjobs_url,
};
use prow_model::{JobCollection, ProwJob, ProwJobState};
use serde::Serialize;
use tracing::debug;

use super::resolve::{JobNamespace, resolve_by_id, resolve_latest_by_name, resolve_running_for_pr};
use super::{ControlError, ProwControlPlane};
use crate::parsers::PullRequestRef;

const RUNNING_STATE: &str = "running";

/// Summary of a single job run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRunSummary {
    pub job_id: Option<String>,
    pub job_name: Option<String>,
    pub state: Option<ProwJobState>,
    pub start: Option<String>,
    pub completion: Option<String>,
    pub url: Option<String>,
    pub build_id: Option<String>,
}

impl From<&ProwJob> for JobRunSummary {
    fn from(job: &ProwJob) -> Self {
        Self {
            job_id: job.metadata.name.clone(),
            job_name: job.spec.job.clone(),
            state: job.status.state,
            start: job.start_time_text().map(str::to_string),
            completion: job.status.completion_time.clone(),
            url: job.status.url.clone(),
            build_id: job.status.build_id.clone(),
        }
    }
}

impl ProwControlPlane {
    /// Fetches the full job listing.
    ///
    /// # Errors
    /// Returns `ControlError` if the listing cannot be fetched or decoded.
    pub async fn list_jobs(&self) -> Result<JobCollection, ControlError> {
        let url = make_prowjobs_url(&self.endpoints.prow_url);
        let jobs: JobCollection = self.gateway.get_json(&url, &[]).await?;
        debug!(count = jobs.items.len(), "fetched job listing");
        Ok(jobs)
    }

    /// Fetches the running jobs for a pull request.
    ///
    /// # Errors
    /// Returns `ControlError` if the listing cannot be fetched or decoded.
    pub async fn list_running_jobs_for_pr(
        &self,
        pr: &PullRequestRef,
    ) -> Result<JobCollection, ControlError> {
        let url = make_prowjobs_query_url(&self.endpoints.prow_url);
        let number = pr.number.to_string();
        let query = [
            (QUERY_ORG, pr.org.as_str()),
            (QUERY_REPO, pr.repo.as_str()),
            (QUERY_PULL, number.as_str()),
            (QUERY_STATE, RUNNING_STATE),
        ];
        let jobs: JobCollection = self.gateway.get_json(&url, &query).await?;
        debug!(%pr, count = jobs.items.len(), "fetched running jobs for pull request");
        Ok(jobs)
    }

    /// Returns the most recently started run of `job_name`.
    ///
    /// # Errors
    /// Returns `ControlError` if the listing fails or no run can be selected.
    pub async fn latest_job_run(&self, job_name: &str) -> Result<JobRunSummary, ControlError> {
        let jobs = self.list_jobs().await?;
        let latest = resolve_latest_by_name(&jobs.items, job_name)?;
        Ok(JobRunSummary::from(latest))
    }

    /// Returns the run with the given id.
    ///
    /// # Errors
    /// Returns `ControlError` if the listing fails or the id is unknown.
    pub async fn job_by_id(&self, job_id: &str) -> Result<ProwJob, ControlError> {
        let jobs = self.list_jobs().await?;
        resolve_by_id(&jobs.items, job_id).cloned()
    }

    /// Returns the `ci-op-*` namespaces of the running jobs for a pull request.
    ///
    /// # Errors
    /// Returns `ControlError` if the listing cannot be fetched or decoded.
    pub async fn running_namespaces_for_pr(
        &self,
        pr: &PullRequestRef,
    ) -> Result<Vec<JobNamespace>, ControlError> {
        let jobs = self.list_running_jobs_for_pr(pr).await?;
        Ok(resolve_running_for_pr(&jobs.items, pr))
    }
}
