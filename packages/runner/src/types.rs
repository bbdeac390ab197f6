use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// One request's isolated execution lifecycle, from workspace allocation to
/// cleanup. Sessions are owned by a single request and never shared.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique identifier, also used to name the session's workspace
    pub id: Uuid,
    /// When the request was accepted
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn begin() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

/// Terminal status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Completed,
    TimedOut,
    Failed,
}

/// Result of one execution, built once per session and returned to the
/// caller without server-side retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Whether the child exited with status zero
    pub success: bool,
    /// Decoded, escape-stripped stdout
    pub output: String,
    /// Decoded stderr; meaningful when `success` is false
    pub error: String,
    /// Base64-encoded artifacts in numeric filename order
    pub images: Vec<String>,
    /// The child was forcibly terminated at the wall-clock bound
    pub timed_out: bool,
}

impl ExecutionOutcome {
    /// Outcome for a run that hit the wall-clock bound. The child was
    /// killed, so no output or artifacts are reported.
    pub fn timed_out() -> Self {
        Self {
            success: false,
            output: String::new(),
            error: String::new(),
            images: Vec::new(),
            timed_out: true,
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.timed_out {
            SessionStatus::TimedOut
        } else if self.success {
            SessionStatus::Completed
        } else {
            SessionStatus::Failed
        }
    }
}

/// Error types for runner operations. These are service faults: the
/// caller's code failing is a normal `ExecutionOutcome`, never an error.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Failed to create workspace {path}: {source}")]
    WorkspaceCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write harness script {path}: {source}")]
    ScriptWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to spawn interpreter '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runner operations
pub type RunnerResult<T> = Result<T, RunnerError>;
