// ABOUTME: Wire response types for the run_code endpoint
// ABOUTME: Field names and shapes are the contract the web client renders

use serde::{Deserialize, Serialize};

use plotpad_runner::ExecutionOutcome;

/// Request body for `POST /run_code`
#[derive(Debug, Deserialize)]
pub struct RunCodeRequest {
    #[serde(default)]
    pub code: String,
}

/// Response body for a completed execution
#[derive(Debug, Serialize)]
pub struct RunCodeResponse {
    pub success: bool,
    pub output: String,
    /// Decoded stderr, populated only when the child exited non-zero
    pub error: Option<String>,
    /// Base64-encoded images in numeric filename order
    pub images: Vec<String>,
}

impl From<ExecutionOutcome> for RunCodeResponse {
    fn from(outcome: ExecutionOutcome) -> Self {
        let error = if outcome.success {
            None
        } else {
            Some(outcome.error)
        };
        Self {
            success: outcome.success,
            output: outcome.output,
            error,
            images: outcome.images,
        }
    }
}

/// Error body for validation failures
#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub success: bool,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Error body for timeout and server faults
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(success: bool) -> ExecutionOutcome {
        ExecutionOutcome {
            success,
            output: "out".to_string(),
            error: "err".to_string(),
            images: vec![],
            timed_out: false,
        }
    }

    #[test]
    fn error_field_is_null_on_success() {
        let response = RunCodeResponse::from(outcome(true));
        assert!(response.success);
        assert_eq!(response.error, None);
    }

    #[test]
    fn error_field_carries_stderr_on_failure() {
        let response = RunCodeResponse::from(outcome(false));
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("err"));
    }
}
