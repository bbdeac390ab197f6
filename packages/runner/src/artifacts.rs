//! Deterministic collection of image artifacts from a session workspace.
//!
//! Executed scripts save figures as `output<N>.png`. Collection orders by
//! the numeric index parsed from the filename (directory-listing order is
//! platform-dependent), caps the count so a malicious script cannot emit
//! unbounded images, and base64-encodes each survivor for transport.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use tracing::warn;

const ARTIFACT_PREFIX: &str = "output";
const ARTIFACT_EXT: &str = ".png";

/// Parse the numeric index out of an `output<N>.png` filename.
///
/// Returns `None` for files outside the naming convention; a conventional
/// name with an unparseable index sorts as index 0.
fn artifact_index(file_name: &str) -> Option<u64> {
    let stem = file_name
        .strip_prefix(ARTIFACT_PREFIX)?
        .strip_suffix(ARTIFACT_EXT)?;
    Some(stem.parse().unwrap_or(0))
}

/// Gather at most `max` artifacts from `dir`, base64-encoded, in ascending
/// numeric index order.
///
/// Collection is best-effort: an unreadable directory yields no artifacts
/// and an unreadable file is skipped, never failing the response.
pub async fn collect_artifacts(dir: &Path, max: usize) -> Vec<String> {
    let mut found: Vec<(u64, PathBuf)> = Vec::new();

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not scan workspace {} for artifacts: {}", dir.display(), e);
            return Vec::new();
        }
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        if let Some(index) = name.to_str().and_then(artifact_index) {
            found.push((index, entry.path()));
        }
    }

    found.sort_by_key(|(index, _)| *index);
    found.truncate(max);

    let mut images = Vec::with_capacity(found.len());
    for (_, path) in found {
        match tokio::fs::read(&path).await {
            Ok(bytes) => images.push(STANDARD.encode(bytes)),
            Err(e) => warn!("Skipping unreadable artifact {}: {}", path.display(), e),
        }
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_numeric_index() {
        assert_eq!(artifact_index("output3.png"), Some(3));
        assert_eq!(artifact_index("output10.png"), Some(10));
    }

    #[test]
    fn unparseable_index_sorts_as_zero() {
        assert_eq!(artifact_index("output.png"), Some(0));
        assert_eq!(artifact_index("outputfinal.png"), Some(0));
    }

    #[test]
    fn ignores_files_outside_the_convention() {
        assert_eq!(artifact_index("script.py"), None);
        assert_eq!(artifact_index("output1.jpg"), None);
        assert_eq!(artifact_index("image1.png"), None);
    }

    #[tokio::test]
    async fn orders_numerically_not_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["output2.png", "output10.png", "output1.png"] {
            tokio::fs::write(dir.path().join(name), name.as_bytes())
                .await
                .unwrap();
        }

        let images = collect_artifacts(dir.path(), 10).await;
        let decoded: Vec<Vec<u8>> = images
            .iter()
            .map(|b64| STANDARD.decode(b64).unwrap())
            .collect();
        assert_eq!(
            decoded,
            vec![
                b"output1.png".to_vec(),
                b"output2.png".to_vec(),
                b"output10.png".to_vec()
            ]
        );
    }

    #[tokio::test]
    async fn caps_artifact_count() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..15 {
            tokio::fs::write(dir.path().join(format!("output{i}.png")), [i as u8])
                .await
                .unwrap();
        }
        let images = collect_artifacts(dir.path(), 10).await;
        assert_eq!(images.len(), 10);
        // Lowest indices survive the cap
        assert_eq!(STANDARD.decode(&images[0]).unwrap(), vec![0u8]);
        assert_eq!(STANDARD.decode(&images[9]).unwrap(), vec![9u8]);
    }

    #[tokio::test]
    async fn base64_round_trips_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let payload: Vec<u8> = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0xFF];
        tokio::fs::write(dir.path().join("output1.png"), &payload)
            .await
            .unwrap();

        let images = collect_artifacts(dir.path(), 10).await;
        assert_eq!(images.len(), 1);
        assert_eq!(STANDARD.decode(&images[0]).unwrap(), payload);
    }

    #[tokio::test]
    async fn missing_directory_yields_no_artifacts() {
        let images = collect_artifacts(Path::new("/nonexistent/workspace"), 10).await;
        assert!(images.is_empty());
    }
}
