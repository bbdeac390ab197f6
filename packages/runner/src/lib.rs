//! Plotpad Runner - Execution session core
//!
//! This crate turns one "run this code" request into a safely bounded,
//! observable, cleanly torn-down execution: a uniquely-owned workspace is
//! allocated, the caller's code is embedded in a fixed Python harness, the
//! harness runs as a time-bounded child process, its output is decoded into
//! display-safe text, and any `output<N>.png` artifacts it produced are
//! collected in numeric order before the workspace is wiped.

pub mod artifacts;
pub mod decode;
pub mod harness;
pub mod session;
pub mod supervisor;
pub mod types;
pub mod workspace;

// Re-export key types and functions for easier use
pub use artifacts::collect_artifacts;
pub use decode::decode_output;
pub use harness::{wrap_code, ERROR_MARKER};
pub use session::{RunnerConfig, SessionManager};
pub use supervisor::{RawOutput, Supervisor};
pub use types::{ExecutionOutcome, RunnerError, RunnerResult, Session};
pub use workspace::{Workspace, WorkspaceManager};
