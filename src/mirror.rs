//! One-way, non-destructive mirroring of the Maven cache into the project repository.
//!
//! Both backends copy only files missing from the destination. Existing files
//! are never overwritten and extra files at the destination are never removed.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use walkdir::WalkDir;

use crate::errors::MirrorError;

/// Which mirror implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorBackend {
    /// Shell out to `rsync --ignore-existing` (default)
    #[default]
    Rsync,
    /// In-process skip-existing copy
    Builtin,
}

impl std::fmt::Display for MirrorBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MirrorBackend::Rsync => write!(f, "rsync"),
            MirrorBackend::Builtin => write!(f, "builtin"),
        }
    }
}

impl std::str::FromStr for MirrorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rsync" => Ok(MirrorBackend::Rsync),
            "builtin" | "copy" => Ok(MirrorBackend::Builtin),
            _ => anyhow::bail!("Invalid mirror backend '{}'. Valid values: rsync, builtin", s),
        }
    }
}

/// What a mirror run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MirrorStats {
    /// Files copied, when the backend can tell.
    pub copied: Option<usize>,
}

/// A skip-existing copy from `source` into `target`.
pub trait Mirror {
    fn name(&self) -> &str;
    fn mirror(&self, source: &Path, target: &Path) -> Result<MirrorStats, MirrorError>;
}

/// Build the mirror for a configured backend.
pub fn mirror_for(backend: MirrorBackend, rsync_cmd: &str) -> Box<dyn Mirror> {
    match backend {
        MirrorBackend::Rsync => Box::new(RsyncMirror::new(rsync_cmd)),
        MirrorBackend::Builtin => Box::new(CopyMirror),
    }
}

fn prepare(source: &Path, target: &Path) -> Result<(), MirrorError> {
    if !source.is_dir() {
        return Err(MirrorError::SourceMissing {
            path: source.to_path_buf(),
        });
    }
    std::fs::create_dir_all(target).map_err(|source| MirrorError::Io {
        path: target.to_path_buf(),
        source,
    })
}

/// Runs `rsync -a --ignore-existing <source>/ <target>/`.
pub struct RsyncMirror {
    cmd: String,
}

impl RsyncMirror {
    pub fn new(cmd: &str) -> Self {
        Self {
            cmd: cmd.to_string(),
        }
    }
}

impl Mirror for RsyncMirror {
    fn name(&self) -> &str {
        &self.cmd
    }

    fn mirror(&self, source: &Path, target: &Path) -> Result<MirrorStats, MirrorError> {
        prepare(source, target)?;

        // Trailing slashes copy the directory's contents rather than the directory itself.
        let output = Command::new(&self.cmd)
            .arg("-a")
            .arg("--ignore-existing")
            .arg(format!("{}/", source.display()))
            .arg(format!("{}/", target.display()))
            .output()
            .map_err(|source| MirrorError::Spawn {
                command: self.cmd.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                tracing::warn!(command = %self.cmd, stderr = %stderr.trim(), "mirror reported errors");
            }
            return Err(MirrorError::ExitStatus {
                command: self.cmd.clone(),
                code: output.status.code().unwrap_or(-1),
            });
        }

        Ok(MirrorStats::default())
    }
}

/// In-process equivalent of the rsync backend.
pub struct CopyMirror;

impl Mirror for CopyMirror {
    fn name(&self) -> &str {
        "builtin"
    }

    fn mirror(&self, source: &Path, target: &Path) -> Result<MirrorStats, MirrorError> {
        prepare(source, target)?;

        let mut copied = 0;
        for entry in WalkDir::new(source).min_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(source).to_path_buf();
                MirrorError::Io {
                    path,
                    source: e.into(),
                }
            })?;
            let rel = match entry.path().strip_prefix(source) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            let dest = target.join(rel);

            let io_err = |source: std::io::Error| MirrorError::Io {
                path: dest.clone(),
                source,
            };
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest).map_err(io_err)?;
            } else if entry.file_type().is_file() {
                if dest.exists() {
                    continue;
                }
                std::fs::copy(entry.path(), &dest).map_err(io_err)?;
                copied += 1;
            } else {
                tracing::debug!(path = %entry.path().display(), "skipping non-regular file");
            }
        }

        Ok(MirrorStats {
            copied: Some(copied),
        })
    }
}
