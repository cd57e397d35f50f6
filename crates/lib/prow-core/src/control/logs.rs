use prow_model::schema::{ARTIFACTS_DIR, BUILD_LOG_FILE};
use serde::Serialize;
use tracing::warn;

use super::{ControlError, ProwControlPlane};

/// Object-storage locations for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactUrls {
    pub artifacts_url: String,
    pub build_log_url: String,
}

impl ArtifactUrls {
    /// Derives the artifact index and build log URLs for a build.
    #[must_use]
    pub fn new(gcs_url: &str, job_name: &str, build_id: &str) -> Self {
        let build_root = format!("{gcs_url}/{job_name}/{build_id}");
        Self {
            artifacts_url: format!("{build_root}/{ARTIFACTS_DIR}"),
            build_log_url: format!("{build_root}/{BUILD_LOG_FILE}"),
        }
    }
}

/// Build log text, or the reason it could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogContent {
    Log(String),
    Error(String),
}

/// Build log for one run together with its artifact index link.
///
/// The artifacts URL is present even when the log fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogBundle {
    pub build_id: String,
    pub job_name: String,
    #[serde(flatten)]
    pub content: LogContent,
    pub artifacts_url: String,
}

impl LogBundle {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.content, LogContent::Log(_))
    }
}

impl ProwControlPlane {
    /// Fetches the build log for a build.
    ///
    /// A failed fetch yields a bundle carrying the error message instead of
    /// the log text.
    pub async fn build_logs(&self, job_name: &str, build_id: &str) -> LogBundle {
        let urls = ArtifactUrls::new(&self.endpoints.gcs_url, job_name, build_id);
        let content = match self.gateway.get_text(&urls.build_log_url, &[]).await {
            Ok(text) => LogContent::Log(text),
            Err(err) => {
                warn!(job_name, build_id, error = %err, "failed to fetch build log");
                LogContent::Error(format!("Failed to fetch logs: {err}"))
            }
        };
        LogBundle {
            build_id: build_id.to_string(),
            job_name: job_name.to_string(),
            content,
            artifacts_url: urls.artifacts_url,
        }
    }

    /// Resolves a run by id and fetches its build log.
    ///
    /// # Errors
    /// Returns `ControlError` if the run cannot be resolved or lacks a build id
    /// or job name.
    pub async fn job_logs_by_id(&self, job_id: &str) -> Result<LogBundle, ControlError> {
        let job = self.job_by_id(job_id).await?;
        let build_id = job.build_id().ok_or_else(|| {
            ControlError::IncompleteRecord(format!("job {job_id} has no build id"))
        })?;
        let job_name = job.job_name().ok_or_else(|| {
            ControlError::IncompleteRecord(format!("job {job_id} has no job name"))
        })?;
        Ok(self.build_logs(job_name, build_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derives_artifact_urls() {
        let urls = ArtifactUrls::new("https://gcs.example/logs", "e2e-aws", "1234");
        assert_eq!(urls.artifacts_url, "https://gcs.example/logs/e2e-aws/1234/artifacts");
        assert_eq!(urls.build_log_url, "https://gcs.example/logs/e2e-aws/1234/build-log.txt");
    }

    #[test]
    fn bundle_flattens_log_or_error() {
        let bundle = LogBundle {
            build_id: "1".to_string(),
            job_name: "e2e".to_string(),
            content: LogContent::Error("boom".to_string()),
            artifacts_url: "https://gcs.example/e2e/1/artifacts".to_string(),
        };
        assert!(!bundle.is_complete());
        assert_eq!(
            serde_json::to_value(&bundle).expect("should encode"),
            json!({
                "build_id": "1",
                "job_name": "e2e",
                "error": "boom",
                "artifacts_url": "https://gcs.example/e2e/1/artifacts"
            })
        );
    }
}
