//! Selection of job records out of an unordered job collection.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use prow_model::ProwJob;
use prow_model::schema::CI_NAMESPACE_PREFIX;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use super::ControlError;
use crate::parsers::{ParseError, PullRequestRef, parse_timestamp};

static CI_NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{CI_NAMESPACE_PREFIX}[a-z0-9]+$"))
        .expect("ci namespace pattern is valid")
});

/// Ephemeral namespace backing one running job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobNamespace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    pub namespace: String,
}

/// Picks the run of `job_name` with the latest start time.
///
/// Runs without a start time are not yet observable and are skipped. Runs
/// whose start time is not a parseable string are logged and left out of
/// the comparison. Equal start times are broken by the greater job id, so the
/// result is deterministic for a given collection.
///
/// # Errors
/// Returns `ControlError::NotFound` if no run of `job_name` has a start time,
/// or `ControlError::MalformedRecord` if every such start time is unparseable.
pub fn resolve_latest_by_name<'a>(
    jobs: &'a [ProwJob],
    job_name: &str,
) -> Result<&'a ProwJob, ControlError> {
    let mut observed = 0_usize;
    let mut latest: Option<(DateTime<Utc>, &ProwJob)> = None;

    for job in jobs.iter().filter(|job| job.job_name() == Some(job_name)) {
        let Some(start_time) = job.status.start_time.as_ref() else {
            continue;
        };
        observed += 1;

        let parsed = start_time
            .as_str()
            .ok_or_else(|| ParseError::InvalidTimestamp(start_time.to_string()))
            .and_then(parse_timestamp);
        let started = match parsed {
            Ok(started) => started,
            Err(err) => {
                warn!(
                    job_id = job.id().unwrap_or_default(),
                    error = %err,
                    "excluding job run with malformed start time"
                );
                continue;
            }
        };

        let newer = latest
            .as_ref()
            .is_none_or(|(best_started, best)| (started, job.id()) > (*best_started, best.id()));
        if newer {
            latest = Some((started, job));
        }
    }

    match latest {
        Some((_, job)) => Ok(job),
        None if observed == 0 => Err(ControlError::NotFound(format!(
            "No matching job found for: {job_name}"
        ))),
        None => Err(ControlError::MalformedRecord(format!(
            "none of the {observed} runs of {job_name} has a parseable start time"
        ))),
    }
}

/// Finds the run whose unique name equals `job_id`.
///
/// Job ids are unique upstream; if that ever fails to hold the first match
/// wins and the duplication is logged.
///
/// # Errors
/// Returns `ControlError::NotFound` if no run has that id.
pub fn resolve_by_id<'a>(jobs: &'a [ProwJob], job_id: &str) -> Result<&'a ProwJob, ControlError> {
    let mut matches = jobs.iter().filter(|job| job.id() == Some(job_id));
    let first = matches
        .next()
        .ok_or_else(|| ControlError::NotFound(format!("No job found with id: {job_id}")))?;

    let duplicates = matches.count();
    if duplicates > 0 {
        warn!(job_id, duplicates, "job id is not unique; using the first match");
    }
    Ok(first)
}

/// Extracts the `ci-op-*` namespaces of the running jobs for a pull request.
///
/// The upstream query already filters by pull request and state; jobs whose
/// pull coordinates are known and point elsewhere are dropped as well. Jobs
/// without a conforming namespace are skipped silently.
#[must_use]
pub fn resolve_running_for_pr(jobs: &[ProwJob], pr: &PullRequestRef) -> Vec<JobNamespace> {
    jobs.iter()
        .filter(|job| job.pull_coordinates().is_none_or(|coordinates| pr.matches(coordinates)))
        .filter_map(|job| {
            let namespace = job.namespace_candidates().find(|candidate| is_ci_namespace(candidate))?;
            Some(JobNamespace {
                job_id: job.id().map(str::to_string),
                job_name: job.job_name().map(str::to_string),
                namespace: namespace.to_string(),
            })
        })
        .collect()
}

#[must_use]
pub fn is_ci_namespace(namespace: &str) -> bool {
    CI_NAMESPACE.is_match(namespace)
}
