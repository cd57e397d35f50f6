use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use prow_model::PullCoordinates;
use regex::Regex;
use serde::Serialize;

use super::ParseError;

static PULL_REQUEST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)/pull/(\d+)(?:[/?#].*)?$",
    )
    .expect("pull request URL pattern is valid")
});

/// Coordinates of a GitHub pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRef {
    pub org: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    /// Whether a job's pull coordinates point at this pull request.
    #[must_use]
    pub fn matches(&self, coordinates: PullCoordinates<'_>) -> bool {
        self.org == coordinates.org
            && self.repo == coordinates.repo
            && self.number == coordinates.number
    }
}

impl FromStr for PullRequestRef {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidPullRequestUrl(value.to_string());
        let captures = PULL_REQUEST_URL.captures(value.trim()).ok_or_else(invalid)?;
        let number = captures[3].parse().map_err(|_| invalid())?;
        Ok(Self {
            org: captures[1].to_string(),
            repo: captures[2].to_string(),
            number,
        })
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.org, self.repo, self.number)
    }
}
