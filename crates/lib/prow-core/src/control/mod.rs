use crate::gateway::{GatewayError, HttpGateway};
use crate::parsers::ParseError;

pub mod cluster;
pub mod jobs;
pub mod logs;
pub mod resolve;

pub use cluster::{ContainerLog, PodLogMap, merge_cluster_config};
pub use jobs::JobRunSummary;
pub use logs::{ArtifactUrls, LogBundle, LogContent};
pub use resolve::{JobNamespace, resolve_by_id, resolve_latest_by_name, resolve_running_for_pr};

#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("{0}")]
    NotFound(String),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("incomplete record: {0}")]
    IncompleteRecord(String),
    #[error("invalid input: {0}")]
    Validation(String),
}

impl From<ParseError> for ControlError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidPullRequestUrl(_) => Self::Validation(err.to_string()),
            ParseError::InvalidTimestamp(_) => Self::MalformedRecord(err.to_string()),
        }
    }
}

/// Base URLs for the upstream services, stored without trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub prow_url: String,
    pub gcs_url: String,
    pub cluster_url: String,
}

impl Endpoints {
    #[must_use]
    pub fn new(
        prow_url: impl AsRef<str>,
        gcs_url: impl AsRef<str>,
        cluster_url: impl AsRef<str>,
    ) -> Self {
        Self {
            prow_url: trim_base(prow_url.as_ref()),
            gcs_url: trim_base(gcs_url.as_ref()),
            cluster_url: trim_base(cluster_url.as_ref()),
        }
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Query surface over Prow and its backing cluster and storage.
///
/// Holds no state between calls: every operation fetches fresh data.
#[derive(Debug, Clone)]
pub struct ProwControlPlane {
    gateway: HttpGateway,
    endpoints: Endpoints,
}

impl ProwControlPlane {
    #[must_use]
    pub const fn new(gateway: HttpGateway, endpoints: Endpoints) -> Self {
        Self { gateway, endpoints }
    }

    #[must_use]
    pub const fn gateway(&self) -> &HttpGateway {
        &self.gateway
    }

    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}
