// ABOUTME: Integration tests for complete execution session lifecycle
// ABOUTME: Tests allocate, wrap, run, decode, collect, and release against a real interpreter

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use plotpad_runner::{RunnerConfig, SessionManager, ERROR_MARKER};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// Check if a Python interpreter is available for testing
async fn is_python_available() -> bool {
    tokio::process::Command::new("python3")
        .arg("--version")
        .output()
        .await
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Set up a session manager rooted at a fresh temp directory
fn setup_manager(base: &TempDir, timeout: Duration) -> SessionManager {
    SessionManager::new(RunnerConfig {
        interpreter: PathBuf::from("python3"),
        timeout,
        workspace_dir: base.path().to_path_buf(),
        max_images: 10,
    })
}

async fn workspace_count(base: &TempDir) -> usize {
    let mut entries = tokio::fs::read_dir(base.path()).await.unwrap();
    let mut count = 0;
    while let Ok(Some(_)) = entries.next_entry().await {
        count += 1;
    }
    count
}

/// Test the happy path: run code, capture output, release the workspace
///
/// This test verifies:
/// 1. A session completes with success=true for exit status zero
/// 2. Decoded stdout carries the script's printed text
/// 3. The workspace is gone by the time the outcome is returned
#[tokio::test]
async fn test_successful_run_lifecycle() {
    if !is_python_available().await {
        println!("Skipping test: python3 not available");
        return;
    }

    let base = TempDir::new().unwrap();
    let manager = setup_manager(&base, Duration::from_secs(30));

    let outcome = manager.run_session("print('hello plotpad')").await.unwrap();

    assert!(outcome.success);
    assert!(!outcome.timed_out);
    assert_eq!(outcome.output, "hello plotpad");
    assert!(outcome.images.is_empty());
    assert_eq!(workspace_count(&base).await, 0);
}

/// An uncaught exception in submitted code is contained by the harness:
/// the process still exits, the diagnostic marker appears in both streams,
/// and the outcome reports failure rather than a service error.
#[tokio::test]
async fn test_execution_error_is_contained() {
    if !is_python_available().await {
        println!("Skipping test: python3 not available");
        return;
    }

    let base = TempDir::new().unwrap();
    let manager = setup_manager(&base, Duration::from_secs(30));

    let outcome = manager
        .run_session("raise ValueError('boom')")
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(!outcome.timed_out);
    assert!(outcome.output.contains(ERROR_MARKER));
    assert!(outcome.error.contains(ERROR_MARKER));
    assert!(outcome.error.contains("boom"));
    assert_eq!(workspace_count(&base).await, 0);
}

/// Artifacts round-trip byte-for-byte and come back in numeric order
#[tokio::test]
async fn test_artifact_round_trip_and_ordering() {
    if !is_python_available().await {
        println!("Skipping test: python3 not available");
        return;
    }

    let base = TempDir::new().unwrap();
    let manager = setup_manager(&base, Duration::from_secs(30));

    let code = r#"
for n, payload in [(2, b'two'), (10, b'ten'), (1, b'one')]:
    with open('output%d.png' % n, 'wb') as f:
        f.write(payload)
"#;
    let outcome = manager.run_session(code).await.unwrap();

    assert!(outcome.success);
    let decoded: Vec<Vec<u8>> = outcome
        .images
        .iter()
        .map(|b64| STANDARD.decode(b64).unwrap())
        .collect();
    assert_eq!(
        decoded,
        vec![b"one".to_vec(), b"two".to_vec(), b"ten".to_vec()]
    );
}

/// A script emitting more images than the cap yields at most the cap
#[tokio::test]
async fn test_artifact_count_is_capped() {
    if !is_python_available().await {
        println!("Skipping test: python3 not available");
        return;
    }

    let base = TempDir::new().unwrap();
    let manager = setup_manager(&base, Duration::from_secs(30));

    let code = r#"
for n in range(15):
    with open('output%d.png' % n, 'wb') as f:
        f.write(bytes([n]))
"#;
    let outcome = manager.run_session(code).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.images.len(), 10);
}

/// A runaway script is killed at the wall-clock bound and reported as a
/// timeout, within a bounded margin of the configured limit
#[tokio::test]
async fn test_timeout_terminates_child() {
    if !is_python_available().await {
        println!("Skipping test: python3 not available");
        return;
    }

    let base = TempDir::new().unwrap();
    let manager = setup_manager(&base, Duration::from_secs(1));

    let started = std::time::Instant::now();
    let outcome = manager
        .run_session("import time\ntime.sleep(60)")
        .await
        .unwrap();

    assert!(outcome.timed_out);
    assert!(!outcome.success);
    assert!(started.elapsed() < Duration::from_secs(15));
    assert_eq!(workspace_count(&base).await, 0);
}

/// Concurrent sessions never observe each other's artifacts: two
/// simultaneous submissions that each write a differently-named image get
/// back only their own
#[tokio::test]
async fn test_concurrent_sessions_are_isolated() {
    if !is_python_available().await {
        println!("Skipping test: python3 not available");
        return;
    }

    let base = TempDir::new().unwrap();
    let manager = setup_manager(&base, Duration::from_secs(30));

    let first = manager.run_session(
        "with open('output1.png', 'wb') as f:\n    f.write(b'from-first')",
    );
    let second = manager.run_session(
        "with open('output2.png', 'wb') as f:\n    f.write(b'from-second')",
    );
    let (a, b) = tokio::join!(first, second);
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.images.len(), 1);
    assert_eq!(b.images.len(), 1);
    assert_eq!(STANDARD.decode(&a.images[0]).unwrap(), b"from-first");
    assert_eq!(STANDARD.decode(&b.images[0]).unwrap(), b"from-second");
    assert_eq!(workspace_count(&base).await, 0);
}

/// Scripts whose relative indentation matters survive harness embedding
#[tokio::test]
async fn test_whitespace_sensitive_code_survives_wrapping() {
    if !is_python_available().await {
        println!("Skipping test: python3 not available");
        return;
    }

    let base = TempDir::new().unwrap();
    let manager = setup_manager(&base, Duration::from_secs(30));

    let code = "total = 0\nfor i in range(4):\n    if i % 2 == 0:\n        total += i\n\nprint(total)";
    let outcome = manager.run_session(code).await.unwrap();

    assert!(outcome.success, "stderr: {}", outcome.error);
    assert_eq!(outcome.output, "2");
}

/// Workspace allocation failure is a service fault, not a panic
#[tokio::test]
#[cfg(unix)]
async fn test_unallocatable_workspace_is_an_error() {
    let manager = SessionManager::new(RunnerConfig {
        interpreter: PathBuf::from("python3"),
        timeout: Duration::from_secs(1),
        workspace_dir: PathBuf::from("/proc/plotpad-cannot-create"),
        max_images: 10,
    });

    assert!(manager.run_session("print(1)").await.is_err());
}
