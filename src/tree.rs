//! JSON snapshot of the repository directory, for consumers without filesystem access.
//!
//! Directories serialize as `{"children": {...}}` and files as `{}`. Children
//! are keyed by name in a `BTreeMap`, so the same directory state always
//! produces the same bytes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::util::write_atomic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Directory { children: BTreeMap<String, TreeNode> },
    File {},
}

/// Recursively snapshot `dir`.
///
/// Linked directories are followed. A link back to a directory already on the
/// current path is recorded as a leaf.
pub fn build_tree(dir: &Path) -> Result<TreeNode> {
    let mut ancestors = Vec::new();
    build_node(dir, &mut ancestors)
}

fn build_node(dir: &Path, ancestors: &mut Vec<PathBuf>) -> Result<TreeNode> {
    let real = dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve directory: {}", dir.display()))?;
    ancestors.push(real);

    let mut children = BTreeMap::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", path.display()))?;

        let node = if file_type.is_dir() {
            build_node(&path, ancestors)?
        } else if file_type.is_symlink() && path.is_dir() {
            match path.canonicalize() {
                Ok(target) if !ancestors.contains(&target) => build_node(&path, ancestors)?,
                _ => {
                    tracing::debug!(path = %path.display(), "directory link cycle, not followed");
                    TreeNode::File {}
                }
            }
        } else {
            TreeNode::File {}
        };
        children.insert(name, node);
    }

    ancestors.pop();
    Ok(TreeNode::Directory { children })
}

/// Snapshot `dir` and write it as compact JSON to `out`.
pub fn write_snapshot(dir: &Path, out: &Path) -> Result<()> {
    let tree = build_tree(dir)?;
    let json = serde_json::to_string(&tree).context("Failed to serialize repository tree")?;
    write_atomic(out, json.as_bytes())
        .with_context(|| format!("Failed to write tree snapshot: {}", out.display()))?;
    tracing::debug!(path = %out.display(), "tree snapshot written");
    Ok(())
}
