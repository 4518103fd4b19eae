//! The `m2sync.toml` configuration file.
//!
//! Every key is optional; a missing file means all defaults.
//!
//! ```toml
//! [paths]
//! source = "~/.m2/repository"
//! target = "repository"
//! manifest = "manifest.json"
//! tree = "repository-tree.json"
//!
//! [bundle]
//! enabled = true
//! source = "~/Documents/ornithe-prism-instance.zip"
//! # dest defaults to the source file name inside the project directory
//!
//! [mirror]
//! backend = "rsync"   # or "builtin"
//! rsync_cmd = "rsync"
//! ```
//!
//! `M2SYNC_SOURCE`, `M2SYNC_TARGET` and `M2SYNC_RSYNC_CMD` override the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::mirror::MirrorBackend;

pub const CONFIG_FILE: &str = "m2sync.toml";

/// Where things live, relative to the project directory unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Maven cache to mirror from
    #[serde(default = "default_source")]
    pub source: String,
    /// Project-local repository to mirror into
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_manifest")]
    pub manifest: String,
    #[serde(default = "default_tree")]
    pub tree: String,
}

fn default_source() -> String {
    "~/.m2/repository".to_string()
}

fn default_target() -> String {
    "repository".to_string()
}

fn default_manifest() -> String {
    "manifest.json".to_string()
}

fn default_tree() -> String {
    "repository-tree.json".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            target: default_target(),
            manifest: default_manifest(),
            tree: default_tree(),
        }
    }
}

/// The auxiliary file copied once into the project directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_bundle_source")]
    pub source: Option<String>,
    #[serde(default)]
    pub dest: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_bundle_source() -> Option<String> {
    Some("~/Documents/ornithe-prism-instance.zip".to_string())
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source: default_bundle_source(),
            dest: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub backend: MirrorBackend,
    #[serde(default = "default_rsync_cmd")]
    pub rsync_cmd: String,
}

fn default_rsync_cmd() -> String {
    "rsync".to_string()
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            backend: MirrorBackend::default(),
            rsync_cmd: default_rsync_cmd(),
        }
    }
}

/// Parsed `m2sync.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct M2SyncToml {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub bundle: BundleConfig,
    #[serde(default)]
    pub mirror: MirrorConfig,
}

impl M2SyncToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse m2sync.toml")
    }

    /// Load `m2sync.toml` from the project directory, or defaults if there is none.
    pub fn load_or_default(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Source directory (env → file).
    pub fn source(&self) -> String {
        std::env::var("M2SYNC_SOURCE").unwrap_or_else(|_| self.paths.source.clone())
    }

    /// Target directory (env → file).
    pub fn target(&self) -> String {
        std::env::var("M2SYNC_TARGET").unwrap_or_else(|_| self.paths.target.clone())
    }

    /// rsync executable (env → file).
    pub fn rsync_cmd(&self) -> String {
        std::env::var("M2SYNC_RSYNC_CMD").unwrap_or_else(|_| self.mirror.rsync_cmd.clone())
    }

    /// Report settings that parse but cannot work.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.paths.target.trim().is_empty() {
            warnings.push("paths.target is empty".to_string());
        }
        if self.paths.manifest.trim().is_empty() {
            warnings.push("paths.manifest is empty".to_string());
        }
        if self.paths.tree.trim().is_empty() {
            warnings.push("paths.tree is empty".to_string());
        }
        if self.bundle.enabled && self.bundle.source.is_none() {
            warnings.push("bundle.enabled is true but bundle.source is not set".to_string());
        }
        warnings
    }
}
