//! Prow job and cluster resource models for prow-mcp.
//!
//! This crate defines the boundary data model decoded from the Prow job API
//! and the Kubernetes resource listings that back a CI run.

pub mod models;
pub mod schema;

pub use models::*;
