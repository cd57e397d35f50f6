//! Outbound HTTP access to the Prow API, the cluster API, and object storage.
//!
//! The gateway owns credential handling and maps transport and status
//! failures into `GatewayError`.

pub mod http;

pub use http::{GatewayError, GatewayResult, HttpGateway, Payload};
