//! Bounded child-process execution.
//!
//! The supervisor launches the harness script rooted at the session
//! workspace (so relative artifact paths resolve inside it), captures both
//! output streams in full, and enforces one wall-clock deadline. Timeout is
//! a normal outcome here, not an error: the endpoint maps it to its own
//! status, while spawn failures are genuine service faults.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

use crate::types::{RunnerError, RunnerResult};

/// Raw result of one supervised run, before any decoding.
#[derive(Debug)]
pub struct RawOutput {
    /// Child exited with status zero
    pub status_success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Child was killed at the wall-clock bound; output is discarded
    pub timed_out: bool,
}

impl RawOutput {
    fn timed_out() -> Self {
        Self {
            status_success: false,
            stdout: Vec::new(),
            stderr: Vec::new(),
            timed_out: true,
        }
    }
}

/// Launches and bounds harness child processes.
#[derive(Debug, Clone)]
pub struct Supervisor {
    interpreter: PathBuf,
    timeout: Duration,
}

impl Supervisor {
    pub fn new(interpreter: PathBuf, timeout: Duration) -> Self {
        Self {
            interpreter,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `interpreter <script>` with `workdir` as the working directory,
    /// capturing stdout and stderr in full until exit or timeout.
    ///
    /// `kill_on_drop` means the child is forcibly terminated the moment the
    /// wait future is dropped by the surrounding `timeout`, so the caller
    /// is never left waiting past the configured bound.
    pub async fn run(&self, script: &Path, workdir: &Path) -> RunnerResult<RawOutput> {
        let mut command = Command::new(&self.interpreter);
        command
            .arg(script)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|source| RunnerError::Spawn {
            command: self.interpreter.display().to_string(),
            source,
        })?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                info!(
                    "Child exited with {} ({} stdout bytes, {} stderr bytes)",
                    output.status,
                    output.stdout.len(),
                    output.stderr.len()
                );
                Ok(RawOutput {
                    status_success: output.status.success(),
                    stdout: output.stdout,
                    stderr: output.stderr,
                    timed_out: false,
                })
            }
            Ok(Err(e)) => Err(RunnerError::Io(e)),
            Err(_) => {
                warn!(
                    "Child exceeded {}s wall-clock bound, killed",
                    self.timeout.as_secs()
                );
                Ok(RawOutput::timed_out())
            }
        }
    }
}
