//! Parsers for loosely formatted caller input and upstream fields.

pub mod pull_request;
pub mod timestamp;

pub use pull_request::PullRequestRef;
pub use timestamp::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid pull request URL: {0}")]
    InvalidPullRequestUrl(String),
    #[error("unparseable timestamp: {0}")]
    InvalidTimestamp(String),
}
