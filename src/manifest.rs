//! The `manifest.json` store.
//!
//! The manifest is a single JSON document:
//!
//! ```json
//! {
//!   "jars": [
//!     {
//!       "group": "com.example",
//!       "artifact": "lib",
//!       "version": "1.0",
//!       "path": "repository/com/example/lib/1.0/lib-1.0.jar",
//!       "repo": "user/lib",
//!       "branch": "main",
//!       "commit": "abc123"
//!     }
//!   ]
//! }
//! ```
//!
//! It is always rewritten whole. A manifest that cannot be read or parsed is
//! treated as empty so a damaged file never blocks a sync.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::artifact::{ArtifactRecord, Provenance};
use crate::util::write_atomic;

/// The persisted list of tracked artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub jars: Vec<ArtifactRecord>,
}

impl Manifest {
    pub fn new(jars: Vec<ArtifactRecord>) -> Self {
        Self { jars }
    }

    /// Load the manifest at `path`, falling back to an empty manifest.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no manifest yet");
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "manifest unreadable, treating as empty");
                return Self::default();
            }
        };

        match serde_json::from_str::<Manifest>(&content) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "manifest malformed, treating as empty");
                Self::default()
            }
        }
    }

    /// Overwrite `path` with this manifest.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize manifest to JSON")?;
        write_atomic(path, content.as_bytes())
            .with_context(|| format!("Failed to write manifest: {}", path.display()))
    }

    /// Provenance already on record, keyed by path inside the repository root.
    pub fn metadata(&self, prefix: &str) -> BTreeMap<String, Provenance> {
        self.jars
            .iter()
            .map(|jar| {
                (
                    jar.relative_path(prefix).to_string(),
                    jar.provenance.clone(),
                )
            })
            .collect()
    }
}

/// All records of one `group:artifact` coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateGroup {
    pub group: String,
    pub artifact: String,
    pub versions: Vec<VersionEntry>,
}

impl CoordinateGroup {
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }

    pub fn version_names(&self) -> Vec<&str> {
        self.versions.iter().map(|v| v.version.as_str()).collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &ArtifactRecord> {
        self.versions.iter().flat_map(|v| v.records.iter())
    }
}

/// The records of one version of a coordinate (a version directory can hold several jars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    pub version: String,
    pub records: Vec<ArtifactRecord>,
}

/// Group records by coordinate, keeping first-seen order for coordinates and versions.
pub fn group_by_coordinate(records: &[ArtifactRecord]) -> Vec<CoordinateGroup> {
    let mut groups: Vec<CoordinateGroup> = Vec::new();

    for record in records {
        let idx = match groups
            .iter()
            .position(|g| g.group == record.group && g.artifact == record.artifact)
        {
            Some(idx) => idx,
            None => {
                groups.push(CoordinateGroup {
                    group: record.group.clone(),
                    artifact: record.artifact.clone(),
                    versions: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let versions = &mut groups[idx].versions;
        match versions.iter_mut().find(|v| v.version == record.version) {
            Some(entry) => entry.records.push(record.clone()),
            None => versions.push(VersionEntry {
                version: record.version.clone(),
                records: vec![record.clone()],
            }),
        }
    }

    groups
}
