//! Artifact records and the directory-depth coordinate convention.
//!
//! Artifacts live in the standard Maven repository layout:
//!
//! ```text
//! repository/
//! └── com/example/        # group, one or more directories
//!     └── lib/            # artifact
//!         └── 1.0/        # version
//!             └── lib-1.0.jar
//! ```
//!
//! Coordinates are read from the three directory levels directly above the
//! file; nothing is parsed out of POM files.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Component, Path};

use crate::errors::LayoutError;

/// Reads a string field, accepting `null` as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Where an artifact was built from. All fields empty means the operator skipped it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub repo: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub branch: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub commit: String,
}

impl Provenance {
    pub fn new(repo: &str, branch: &str, commit: &str) -> Self {
        Self {
            repo: repo.to_string(),
            branch: branch.to_string(),
            commit: commit.to_string(),
        }
    }

    /// The record stored for an artifact the operator chose not to describe.
    pub fn skipped() -> Self {
        Self::default()
    }

    pub fn is_skipped(&self) -> bool {
        self.repo.is_empty()
    }
}

/// Group, artifact and version derived from an artifact's location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinates {
    /// Derive coordinates from a `/`-separated path relative to the repository root.
    ///
    /// The file must have at least three ancestor directories: the version,
    /// the artifact, and one or more group directories (joined with `.`).
    pub fn from_relative(rel_path: &str) -> Result<Self, LayoutError> {
        let segments: Vec<&str> = rel_path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 4 {
            return Err(LayoutError::TooShallow {
                path: rel_path.to_string(),
            });
        }

        let n = segments.len();
        Ok(Self {
            group: segments[..n - 3].join("."),
            artifact: segments[n - 3].to_string(),
            version: segments[n - 2].to_string(),
        })
    }
}

/// Express `file` relative to `root` as a `/`-separated string.
pub fn relative_path(root: &Path, file: &Path) -> Result<String, LayoutError> {
    let rel = file
        .strip_prefix(root)
        .map_err(|_| LayoutError::OutsideRoot {
            path: file.to_path_buf(),
            root: root.to_path_buf(),
        })?;

    let mut parts = Vec::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| LayoutError::NonUtf8 {
                path: file.to_path_buf(),
            })?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}

/// One tracked artifact as it appears in `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub group: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artifact: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub version: String,
    /// Path of the artifact file, prefixed with the repository directory name.
    pub path: String,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl ArtifactRecord {
    /// Build a record for an artifact at `rel_path` inside the repository root.
    pub fn from_relative(
        rel_path: &str,
        prefix: &str,
        provenance: Provenance,
    ) -> Result<Self, LayoutError> {
        let coords = Coordinates::from_relative(rel_path)?;
        let path = if prefix.is_empty() {
            rel_path.to_string()
        } else {
            format!("{}/{}", prefix, rel_path)
        };

        Ok(Self {
            group: coords.group,
            artifact: coords.artifact,
            version: coords.version,
            path,
            provenance,
        })
    }

    /// The `group:artifact` identifier shared by all versions of this artifact.
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }

    /// Path inside the repository root, with the manifest prefix stripped once.
    pub fn relative_path<'a>(&'a self, prefix: &str) -> &'a str {
        if prefix.is_empty() {
            return &self.path;
        }
        self.path
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.path)
    }
}
