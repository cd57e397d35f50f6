use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnError, VecSkipError, serde_as};
use tracing::warn;

/// Object metadata shared by Prow jobs and Kubernetes resources.
///
/// Here and in the records below, a field holding a value of the wrong type
/// decodes as absent instead of failing the whole record.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectMeta {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Lifecycle state reported by Prow for a job run.
///
/// Prow's wire names are used on output; the long-form names are accepted as
/// aliases. Anything else decodes to `Unknown`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProwJobState {
    Triggered,
    Pending,
    Running,
    #[serde(rename = "success", alias = "succeeded")]
    Succeeded,
    #[serde(rename = "failure", alias = "failed")]
    Failed,
    Aborted,
    Error,
    #[serde(other)]
    Unknown,
}

/// A single pull request referenced by a job.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pull {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
}

/// Repository references attached to presubmit and postsubmit jobs.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Refs {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pulls: Vec<Pull>,
}

/// Immutable submission facet of a job record.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProwJobSpec {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull: Option<u64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refs: Option<Refs>,
}

/// Mutable run facet of a job record, filled in as the run progresses.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProwJobStatus {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ProwJobState>,
    /// Kept undecoded so a present but malformed start time can be told
    /// apart from a missing one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(
        default,
        rename = "build_id",
        alias = "buildId",
        skip_serializing_if = "Option::is_none"
    )]
    pub build_id: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// One run of a Prow job as reported by the job API.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProwJob {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub spec: ProwJobSpec,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub status: ProwJobStatus,
}

/// Pull request coordinates carried by a job's spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullCoordinates<'a> {
    pub org: &'a str,
    pub repo: &'a str,
    pub number: u64,
}

impl ProwJob {
    /// The run's unique name, used as its job id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    #[must_use]
    pub fn job_name(&self) -> Option<&str> {
        self.spec.job.as_deref()
    }

    #[must_use]
    pub fn build_id(&self) -> Option<&str> {
        self.status.build_id.as_deref()
    }

    /// The start time when it was reported as a string.
    #[must_use]
    pub fn start_time_text(&self) -> Option<&str> {
        self.status.start_time.as_ref().and_then(Value::as_str)
    }

    /// Pull request coordinates from the flat spec fields, falling back to
    /// the first pull in `spec.refs`.
    #[must_use]
    pub fn pull_coordinates(&self) -> Option<PullCoordinates<'_>> {
        let refs = self.spec.refs.as_ref();
        let org = self
            .spec
            .org
            .as_deref()
            .or_else(|| refs.and_then(|refs| refs.org.as_deref()))?;
        let repo = self
            .spec
            .repo
            .as_deref()
            .or_else(|| refs.and_then(|refs| refs.repo.as_deref()))?;
        let number = self
            .spec
            .pull
            .or_else(|| refs.and_then(|refs| refs.pulls.first()).and_then(|pull| pull.number))?;
        Some(PullCoordinates { org, repo, number })
    }

    /// Namespace candidates in lookup order: the run's status, then metadata.
    pub fn namespace_candidates(&self) -> impl Iterator<Item = &str> {
        self.status
            .namespace
            .as_deref()
            .into_iter()
            .chain(self.metadata.namespace.as_deref())
    }
}

/// Undecoded job listing as returned by the job API.
#[derive(Debug, Deserialize)]
struct RawJobList {
    #[serde(default)]
    items: Vec<Value>,
}

/// Unordered set of job records fetched in a single query.
///
/// Items are decoded one at a time; an item that is not a job object at all
/// is dropped with a warning instead of failing the listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawJobList")]
pub struct JobCollection {
    pub items: Vec<ProwJob>,
}

impl From<RawJobList> for JobCollection {
    fn from(raw: RawJobList) -> Self {
        let mut items = Vec::with_capacity(raw.items.len());
        for (index, item) in raw.items.into_iter().enumerate() {
            match serde_json::from_value::<ProwJob>(item) {
                Ok(job) => items.push(job),
                Err(err) => warn!(index, error = %err, "skipping undecodable job record"),
            }
        }
        Self { items }
    }
}

impl From<Vec<ProwJob>> for JobCollection {
    fn from(items: Vec<ProwJob>) -> Self {
        Self { items }
    }
}

/// Kubernetes pod listing. Items that are not objects are skipped.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodList {
    #[serde_as(as = "VecSkipError<_>")]
    #[serde(default)]
    pub items: Vec<Pod>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pod {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub status: PodStatus,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodStatus {
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub container_statuses: Vec<ContainerStatus>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerStatus {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Kubernetes configmap listing. Items that are not objects are skipped.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigMapList {
    #[serde_as(as = "VecSkipError<_>")]
    #[serde(default)]
    pub items: Vec<ConfigMap>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigMap {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_prow_job_record() {
        let job: ProwJob = serde_json::from_value(json!({
            "metadata": { "name": "0b5e1f3a", "namespace": "ci" },
            "spec": {
                "job": "pull-ci-openshift-origin-master-e2e-aws",
                "type": "presubmit",
                "refs": { "org": "openshift", "repo": "origin", "pulls": [{ "number": 123 }] }
            },
            "status": {
                "state": "success",
                "startTime": "2025-03-01T10:00:00Z",
                "completionTime": "2025-03-01T11:00:00Z",
                "url": "https://prow.example/view/gs/logs/job/42",
                "build_id": "42"
            }
        }))
        .expect("job should decode");

        assert_eq!(job.id(), Some("0b5e1f3a"));
        assert_eq!(job.job_name(), Some("pull-ci-openshift-origin-master-e2e-aws"));
        assert_eq!(job.build_id(), Some("42"));
        assert_eq!(job.status.state, Some(ProwJobState::Succeeded));
        assert_eq!(
            job.pull_coordinates(),
            Some(PullCoordinates {
                org: "openshift",
                repo: "origin",
                number: 123,
            })
        );
    }

    #[test]
    fn state_accepts_aliases_and_unknown_values() {
        let states: Vec<ProwJobState> =
            serde_json::from_value(json!(["failed", "running", "scheduling"]))
                .expect("states should decode");
        assert_eq!(
            states,
            vec![ProwJobState::Failed, ProwJobState::Running, ProwJobState::Unknown]
        );
        assert_eq!(
            serde_json::to_value(ProwJobState::Succeeded).expect("state should encode"),
            json!("success")
        );
    }

    #[test]
    fn mistyped_fields_do_not_drop_the_record() {
        let collection: JobCollection = serde_json::from_value(json!({
            "items": [
                { "metadata": { "name": "a" }, "spec": { "job": "e2e", "pull": "123" } },
                { "metadata": { "name": "b" }, "status": { "startTime": 17, "state": 5 } },
                { "metadata": { "name": "c" }, "spec": { "refs": { "pulls": [{ "number": "x" }] } } },
                "not-a-job"
            ]
        }))
        .expect("collection should decode");

        let ids: Vec<Option<&str>> = collection.items.iter().map(ProwJob::id).collect();
        assert_eq!(ids, vec![Some("a"), Some("b"), Some("c")]);

        assert_eq!(collection.items[0].job_name(), Some("e2e"));
        assert_eq!(collection.items[0].spec.pull, None);

        let malformed = &collection.items[1];
        assert_eq!(malformed.status.start_time, Some(json!(17)));
        assert_eq!(malformed.start_time_text(), None);
        assert_eq!(malformed.status.state, None);

        assert_eq!(collection.items[2].spec.refs.as_ref().map(|refs| refs.pulls.len()), Some(1));
        assert_eq!(collection.items[2].pull_coordinates(), None);
    }

    #[test]
    fn missing_and_null_start_times_are_absent() {
        let job: ProwJob = serde_json::from_value(json!({ "status": { "startTime": null } }))
            .expect("job should decode");
        assert_eq!(job.status.start_time, None);
        assert_eq!(ProwJob::default().status.start_time, None);
    }

    #[test]
    fn pod_and_configmap_listings_survive_odd_entries() {
        let pods: PodList = serde_json::from_value(json!({
            "items": [
                {
                    "metadata": { "name": "p1" },
                    "status": { "containerStatuses": [{ "name": 7 }, { "name": "test" }, "junk"] }
                },
                42
            ]
        }))
        .expect("pods should decode");
        assert_eq!(pods.items.len(), 1);
        let names: Vec<Option<&str>> = pods.items[0]
            .status
            .container_statuses
            .iter()
            .map(|status| status.name.as_deref())
            .collect();
        assert_eq!(names, vec![None, Some("test")]);

        let config_maps: ConfigMapList = serde_json::from_value(json!({
            "items": [
                { "metadata": { "name": "cluster-a" }, "data": ["not", "a", "map"] },
                { "metadata": { "name": "cluster-b" }, "data": { "k": "v" } }
            ]
        }))
        .expect("configmaps should decode");
        assert_eq!(config_maps.items.len(), 2);
        assert!(config_maps.items[0].data.is_empty());
        assert_eq!(config_maps.items[1].data.get("k"), Some(&json!("v")));
    }

    #[test]
    fn namespace_candidates_prefer_status() {
        let job: ProwJob = serde_json::from_value(json!({
            "metadata": { "name": "a", "namespace": "ci" },
            "status": { "namespace": "ci-op-abc123" }
        }))
        .expect("job should decode");

        let candidates: Vec<&str> = job.namespace_candidates().collect();
        assert_eq!(candidates, vec!["ci-op-abc123", "ci"]);
    }
}
