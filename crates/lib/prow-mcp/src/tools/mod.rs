//! MCP tool modules.
//!
//! Tools are grouped by domain: job runs and their logs, PR namespaces and
//! cluster metadata, and contextual help.

pub mod cluster;
pub mod jobs;
mod context;
