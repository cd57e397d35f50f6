//! Core services for prow-mcp.
//!
//! This crate resolves Prow job records, locates their logs and artifacts in
//! object storage, and inspects the ephemeral namespaces that back running
//! jobs. All upstream access goes through the HTTP gateway.

pub mod control;
pub mod gateway;
pub mod parsers;
