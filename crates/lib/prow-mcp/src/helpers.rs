use std::borrow::Cow;

use prow_core::control::ControlError;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, ErrorCode};
use serde::Serialize;
use tracing::warn;

/// Error payload returned to the caller when a tool call fails.
#[derive(Debug, Serialize)]
struct ToolFailure {
    error: String,
}

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub fn invalid_params(message: impl Into<Cow<'static, str>>) -> ErrorData {
    mcp_err(ErrorCode::INVALID_PARAMS, message)
}

/// Turns a control-plane outcome into a tool result.
///
/// Validation failures are raised as protocol errors; every other failure
/// becomes an `{ "error": ... }` payload flagged as a tool error.
pub fn tool_result<T: Serialize>(
    context: &str,
    result: Result<T, ControlError>,
) -> Result<CallToolResult, ErrorData> {
    match result {
        Ok(value) => Ok(CallToolResult::success(vec![Content::json(value)?])),
        Err(ControlError::Validation(message)) => Err(invalid_params(message)),
        Err(ControlError::NotFound(message)) => failure(message),
        Err(err) => {
            warn!(error = %err, "{context}");
            failure(format!("{context}: {err}"))
        }
    }
}

fn failure(error: String) -> Result<CallToolResult, ErrorData> {
    Ok(CallToolResult::error(vec![Content::json(ToolFailure { error })?]))
}

/// Trims an optional argument, treating blank values as absent.
pub fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Trims a required argument.
pub fn required(value: String, name: &'static str) -> Result<String, ErrorData> {
    normalize(Some(value)).ok_or_else(|| invalid_params(format!("{name} is required")))
}

/// Decodes the JSON payload of a tool result.
#[cfg(test)]
pub fn payload(result: &CallToolResult) -> serde_json::Value {
    let encoded = serde_json::to_value(result).expect("result should encode");
    let text = encoded["content"][0]["text"]
        .as_str()
        .expect("content should be text");
    serde_json::from_str(text).expect("content should be json")
}

/// Builds a server whose upstreams all live under `base`.
#[cfg(test)]
pub fn server_at(base: &str) -> crate::ProwMcp {
    use prow_core::control::{Endpoints, ProwControlPlane};
    use prow_core::gateway::HttpGateway;

    let gateway = HttpGateway::new(None).expect("gateway should build");
    let endpoints = Endpoints::new(
        format!("{base}/prow"),
        format!("{base}/gcs/logs"),
        format!("{base}/k8s"),
    );
    crate::ProwMcp::new(ProwControlPlane::new(gateway, endpoints))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn success_wraps_value() {
        let result = tool_result("ctx", Ok(json!({ "job_id": "a" }))).expect("should succeed");
        assert_eq!(result.is_error, Some(false));
        assert_eq!(payload(&result), json!({ "job_id": "a" }));
    }

    #[test]
    fn not_found_is_an_error_payload() {
        let result = tool_result::<Value>(
            "Failed to fetch job info",
            Err(ControlError::NotFound("No matching job found for: e2e".to_string())),
        )
        .expect("should produce a tool result");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(payload(&result), json!({ "error": "No matching job found for: e2e" }));
    }

    #[test]
    fn other_failures_carry_context() {
        let result = tool_result::<Value>(
            "Failed to fetch job logs",
            Err(ControlError::IncompleteRecord("job a has no build id".to_string())),
        )
        .expect("should produce a tool result");
        assert_eq!(
            payload(&result),
            json!({ "error": "Failed to fetch job logs: incomplete record: job a has no build id" })
        );
    }

    #[test]
    fn validation_is_a_protocol_error() {
        let err = tool_result::<Value>("ctx", Err(ControlError::Validation("bad".to_string())))
            .expect_err("should fail");
        assert_eq!(err.code.0, ErrorCode::INVALID_PARAMS.0);
    }

    #[test]
    fn required_arguments_are_trimmed() {
        assert_eq!(required("  e2e ".to_string(), "job_name").expect("present"), "e2e");
        assert!(required("   ".to_string(), "job_name").is_err());
        assert_eq!(normalize(Some(String::new())), None);
    }
}
