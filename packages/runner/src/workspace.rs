//! Per-session workspace allocation and teardown.
//!
//! Every session gets a directory named by its own uuid under a configured
//! base, so concurrent sessions can never see each other's harness file or
//! artifacts and no lock is needed anywhere in the run path.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::types::{RunnerError, RunnerResult};

/// Deletion retries for directories with a just-closed file handle still
/// flushing (seen on Windows and some network filesystems).
const RELEASE_ATTEMPTS: u32 = 3;
const RELEASE_BACKOFF: Duration = Duration::from_millis(500);

/// Allocates uniquely-named workspace directories under a fixed base.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    base_dir: PathBuf,
}

impl WorkspaceManager {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create a fresh workspace for the given session id.
    ///
    /// The directory is `<base>/<session id>`; uuid naming guarantees no
    /// collision with any live or prior session.
    pub async fn allocate(&self, session_id: Uuid) -> RunnerResult<Workspace> {
        let path = self.base_dir.join(session_id.to_string());
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| RunnerError::WorkspaceCreate {
                path: path.clone(),
                source,
            })?;
        debug!("Allocated workspace: {}", path.display());
        Ok(Workspace {
            path,
            released: false,
        })
    }
}

/// A uniquely-owned session directory. Released explicitly on every exit
/// path; `Drop` is only a backstop for early returns.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    released: bool,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recursively remove the workspace, retrying transient failures.
    ///
    /// A stuck temp file must never block the response path: after the
    /// final attempt the failure is logged and the call returns.
    pub async fn release(&mut self) {
        if self.released {
            return;
        }
        for attempt in 1..=RELEASE_ATTEMPTS {
            match tokio::fs::remove_dir_all(&self.path).await {
                Ok(()) => {
                    debug!("Released workspace: {}", self.path.display());
                    self.released = true;
                    return;
                }
                Err(_) if !self.path.exists() => {
                    self.released = true;
                    return;
                }
                Err(e) if attempt < RELEASE_ATTEMPTS => {
                    debug!(
                        "Workspace release attempt {} failed for {}: {}",
                        attempt,
                        self.path.display(),
                        e
                    );
                    tokio::time::sleep(RELEASE_BACKOFF).await;
                }
                Err(e) => {
                    warn!(
                        "Could not remove workspace {} after {} attempts: {}",
                        self.path.display(),
                        RELEASE_ATTEMPTS,
                        e
                    );
                    self.released = true;
                }
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                if self.path.exists() {
                    warn!(
                        "Workspace {} leaked on drop: {}",
                        self.path.display(),
                        e
                    );
                }
            }
        }
    }
}
