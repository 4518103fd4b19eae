//! Artifact discovery in the mirrored repository.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension of a packaged artifact.
pub const ARTIFACT_EXTENSION: &str = ".jar";

/// Directory name marking vendored content that is never tracked.
pub const NESTED_MARKER: &str = "submodule";

/// Classifier suffixes of sidecar files published next to the main artifact.
pub const SIDECAR_SUFFIXES: &[&str] = &[
    "-sources.jar",
    "-javadoc.jar",
    "-tests.jar",
    "-test.jar",
    "-dev.jar",
];

/// Whether a file name is a sidecar classifier rather than the artifact itself.
pub fn is_sidecar(file_name: &str) -> bool {
    SIDECAR_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
}

/// Whether `path` (relative to the root) passes through a nested marker directory.
fn is_nested(rel: &Path) -> bool {
    rel.parent()
        .map(|dir| dir.components().any(|c| c.as_os_str() == NESTED_MARKER))
        .unwrap_or(false)
}

/// Find every tracked artifact under `root`, sorted by full path.
///
/// A missing root yields no artifacts.
pub fn scan_artifacts(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut artifacts = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        // Linked files count; linked directories are not descended.
        if entry.file_type().is_dir() || !entry.path().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(ARTIFACT_EXTENSION) || is_sidecar(&name) {
            continue;
        }

        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if is_nested(rel) {
            tracing::debug!(path = %entry.path().display(), "skipping nested artifact");
            continue;
        }

        artifacts.push(entry.into_path());
    }

    artifacts.sort();
    Ok(artifacts)
}
