//! Sequences one execution session end to end.
//!
//! The manager owns the explicit configuration (interpreter, timeout,
//! workspace base, artifact cap) and walks each request through
//! allocate -> write harness -> supervise -> decode -> collect -> release.
//! The workspace is released on every exit path; sessions share no mutable
//! state, so any number can run concurrently without locks.

use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use crate::artifacts::collect_artifacts;
use crate::decode::decode_output;
use crate::harness::{wrap_code, SCRIPT_NAME};
use crate::supervisor::Supervisor;
use crate::types::{ExecutionOutcome, RunnerError, RunnerResult, Session};
use crate::workspace::{Workspace, WorkspaceManager};

/// Explicit runner configuration, passed in at construction rather than
/// read from ambient state.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Interpreter binary used to run the harness
    pub interpreter: PathBuf,
    /// Wall-clock bound for one execution
    pub timeout: Duration,
    /// Base directory for per-session workspaces
    pub workspace_dir: PathBuf,
    /// Upper bound on artifacts returned per execution
    pub max_images: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from("python3"),
            timeout: Duration::from_secs(1000),
            workspace_dir: std::env::temp_dir().join("plotpad"),
            max_images: 10,
        }
    }
}

/// Drives execution sessions. Cheap to clone and share across request
/// handlers; all per-request state lives in the session itself.
#[derive(Debug, Clone)]
pub struct SessionManager {
    workspaces: WorkspaceManager,
    supervisor: Supervisor,
    max_images: usize,
}

impl SessionManager {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            workspaces: WorkspaceManager::new(config.workspace_dir),
            supervisor: Supervisor::new(config.interpreter, config.timeout),
            max_images: config.max_images,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.supervisor.timeout()
    }

    /// Run one submitted snippet to completion, timeout, or failure.
    ///
    /// Errors are infrastructure faults only (workspace allocation, harness
    /// write, spawn); the caller's code failing or timing out is reported
    /// inside the `ExecutionOutcome`.
    pub async fn run_session(&self, code: &str) -> RunnerResult<ExecutionOutcome> {
        let session = Session::begin();
        info!("Session {} started", session.id);

        let mut workspace = self.workspaces.allocate(session.id).await?;
        let result = self.execute(&session, &workspace, code).await;
        workspace.release().await;

        match &result {
            Ok(outcome) => info!(
                "Session {} finished: {:?} ({} images, {}ms)",
                session.id,
                outcome.status(),
                outcome.images.len(),
                (chrono::Utc::now() - session.started_at).num_milliseconds()
            ),
            Err(e) => error!("Session {} failed: {}", session.id, e),
        }
        result
    }

    async fn execute(
        &self,
        session: &Session,
        workspace: &Workspace,
        code: &str,
    ) -> RunnerResult<ExecutionOutcome> {
        let script_path = workspace.path().join(SCRIPT_NAME);
        tokio::fs::write(&script_path, wrap_code(code))
            .await
            .map_err(|source| RunnerError::ScriptWrite {
                path: script_path.clone(),
                source,
            })?;

        let raw = self.supervisor.run(&script_path, workspace.path()).await?;
        if raw.timed_out {
            info!("Session {} hit the wall-clock bound", session.id);
            return Ok(ExecutionOutcome::timed_out());
        }

        let images = collect_artifacts(workspace.path(), self.max_images).await;
        Ok(ExecutionOutcome {
            success: raw.status_success,
            output: decode_output(&raw.stdout),
            error: decode_output(&raw.stderr),
            images,
            timed_out: false,
        })
    }
}
