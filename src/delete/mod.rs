//! Interactive removal of tracked artifact versions.
//!
//! The operator picks a coordinate, then (when there is more than one) the
//! versions to remove, then confirms. Nothing on disk or in the manifest
//! changes before the confirmation. Each removed version directory takes its
//! now-empty ancestors with it, up to but never including the repository root.

pub mod selection;

use anyhow::{Context, Result};
use console::style;
use std::path::{Component, Path, PathBuf};

use crate::artifact::ArtifactRecord;
use crate::config::Config;
use crate::errors::SelectionError;
use crate::manifest::{CoordinateGroup, Manifest, VersionEntry, group_by_coordinate};
use crate::prompt::Operator;
use crate::tree::write_snapshot;
use crate::ui;
use crate::ui::icons::FILE_DEL;

pub use selection::{VersionSelection, parse_choice, parse_versions};

#[derive(Debug)]
pub enum DeleteOutcome {
    /// The manifest lists no artifacts.
    NothingTracked,
    Cancelled,
    /// An answer did not name a menu entry; nothing was changed.
    Invalid(SelectionError),
    /// The records removed from the manifest.
    Deleted(Vec<ArtifactRecord>),
}

pub struct DeleteOrchestrator<'a> {
    config: &'a Config,
}

impl<'a> DeleteOrchestrator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn run(&self, operator: &mut dyn Operator) -> Result<DeleteOutcome> {
        let manifest = Manifest::load(&self.config.manifest_file);
        let groups = group_by_coordinate(&manifest.jars);
        if groups.is_empty() {
            println!("No artifacts tracked in {}", self.config.manifest_file.display());
            return Ok(DeleteOutcome::NothingTracked);
        }

        println!();
        for (i, group) in groups.iter().enumerate() {
            println!(
                "  {:>3}) {} {}",
                i + 1,
                group.coordinate(),
                style(format!("({})", group.version_names().join(", "))).dim()
            );
        }
        println!("  {:>3}) Cancel", 0);

        let answer = operator.input("Select artifact")?;
        let group = match parse_choice(&answer, groups.len()) {
            Ok(Some(idx)) => &groups[idx],
            Ok(None) => return Ok(cancelled()),
            Err(e) => return Ok(invalid(e)),
        };

        let versions = match self.select_versions(group, operator)? {
            Ok(Some(versions)) => versions,
            Ok(None) => return Ok(cancelled()),
            Err(e) => return Ok(invalid(e)),
        };

        let prefix = self.config.manifest_prefix();
        let root = &self.config.target_dir;
        let mut dirs: Vec<PathBuf> = Vec::new();
        println!();
        println!("The following will be deleted:");
        for entry in &versions {
            for record in &entry.records {
                match version_dir(root, record.relative_path(&prefix)) {
                    Some(dir) => {
                        if !dirs.contains(&dir) {
                            println!("  {}{}", FILE_DEL, dir.display());
                            dirs.push(dir);
                        }
                    }
                    None => {
                        ui::warning(format!("Skipping unsafe manifest path: {}", record.path));
                    }
                }
            }
        }

        let prompt = format!(
            "Delete {} version(s) of {}?",
            versions.len(),
            group.coordinate()
        );
        if !operator.confirm(&prompt)? {
            return Ok(cancelled());
        }

        for dir in &dirs {
            remove_version_dir(dir, root)?;
        }

        let (removed, kept): (Vec<ArtifactRecord>, Vec<ArtifactRecord>) =
            manifest.jars.into_iter().partition(|record| {
                let file = root.join(record.relative_path(&prefix));
                dirs.iter().any(|dir| file.starts_with(dir))
            });

        Manifest::new(kept).save(&self.config.manifest_file)?;
        if root.is_dir() {
            write_snapshot(root, &self.config.tree_file)?;
        }

        ui::success(format!(
            "Deleted {} version(s) of {}",
            versions.len(),
            group.coordinate()
        ));
        tracing::info!(
            coordinate = %group.coordinate(),
            records = removed.len(),
            "artifacts deleted"
        );
        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Ask which versions to remove. A single version needs no question.
    fn select_versions<'g>(
        &self,
        group: &'g CoordinateGroup,
        operator: &mut dyn Operator,
    ) -> Result<Result<Option<Vec<&'g VersionEntry>>, SelectionError>> {
        if group.versions.len() == 1 {
            return Ok(Ok(Some(group.versions.iter().collect())));
        }

        println!();
        println!("Versions of {}:", style(group.coordinate()).bold());
        for (i, version) in group.versions.iter().enumerate() {
            println!("  {:>3}) {}", i + 1, version.version);
        }
        println!("  {:>3}) All versions", group.versions.len() + 1);
        println!("  {:>3}) Cancel", 0);

        let answer = operator.input("Select version(s)")?;
        let selected = match parse_versions(&answer, group.versions.len()) {
            Ok(Some(VersionSelection::All)) => Some(group.versions.iter().collect()),
            Ok(Some(VersionSelection::Some(indices))) => {
                Some(indices.into_iter().map(|i| &group.versions[i]).collect())
            }
            Ok(None) => None,
            Err(e) => return Ok(Err(e)),
        };
        Ok(Ok(selected))
    }
}

fn cancelled() -> DeleteOutcome {
    println!("Deletion cancelled.");
    DeleteOutcome::Cancelled
}

fn invalid(err: SelectionError) -> DeleteOutcome {
    ui::failure(format!("Invalid selection: {}", err));
    DeleteOutcome::Invalid(err)
}

/// The version directory holding the artifact at `rel_path`.
///
/// `None` when the path would escape the root or has no directory inside it.
fn version_dir(root: &Path, rel_path: &str) -> Option<PathBuf> {
    let rel = Path::new(rel_path);
    if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    let parent = rel.parent()?;
    if parent.as_os_str().is_empty() {
        return None;
    }
    Some(root.join(parent))
}

/// Remove `dir` recursively, then its now-empty ancestors below `root`.
pub fn remove_version_dir(dir: &Path, root: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to remove {}", dir.display()))?;
        tracing::debug!(path = %dir.display(), "removed version directory");
    }

    match dir.parent() {
        Some(parent) => prune_empty_ancestors(parent, root),
        None => Ok(()),
    }
}

/// Remove empty directories from `dir` upward, stopping at `root` or the first non-empty one.
pub fn prune_empty_ancestors(dir: &Path, root: &Path) -> Result<()> {
    let mut current = dir;
    while current != root && current.starts_with(root) {
        if current.exists() {
            let mut entries = std::fs::read_dir(current)
                .with_context(|| format!("Failed to read directory: {}", current.display()))?;
            if entries.next().is_some() {
                break;
            }
            std::fs::remove_dir(current)
                .with_context(|| format!("Failed to remove {}", current.display()))?;
            tracing::debug!(path = %current.display(), "removed empty directory");
        }

        current = match current.parent() {
            Some(parent) => parent,
            None => break,
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Provenance;
    use crate::prompt::LineOperator;
    use std::fs;
    use std::io::Cursor;
    use tempfile::{TempDir, tempdir};

    fn setup(rels: &[&str]) -> (TempDir, Config) {
        let dir = tempdir().unwrap();
        let root = dir.path().join("repository");
        let mut jars = Vec::new();
        for rel in rels {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
            jars.push(
                ArtifactRecord::from_relative(rel, "repository", Provenance::skipped()).unwrap(),
            );
        }
        let config = Config::for_dirs(dir.path(), &dir.path().join("m2"), &root);
        Manifest::new(jars).save(&config.manifest_file).unwrap();
        (dir, config)
    }

    fn run(config: &Config, answers: &str) -> DeleteOutcome {
        let mut op = LineOperator::new(Cursor::new(answers.to_string()));
        DeleteOrchestrator::new(config).run(&mut op).unwrap()
    }

    #[test]
    fn test_delete_only_version_prunes_empty_parents() {
        let (_dir, config) = setup(&["com/example/lib/1.0/lib-1.0.jar"]);

        let outcome = run(&config, "1\ny\n");

        assert!(matches!(outcome, DeleteOutcome::Deleted(ref r) if r.len() == 1));
        assert!(!config.target_dir.join("com").exists());
        assert!(config.target_dir.is_dir());
        assert!(Manifest::load(&config.manifest_file).jars.is_empty());
        assert_eq!(
            fs::read_to_string(&config.tree_file).unwrap(),
            r#"{"children":{}}"#
        );
    }

    #[test]
    fn test_delete_all_versions() {
        let (_dir, config) = setup(&[
            "com/example/lib/1.0/lib-1.0.jar",
            "com/example/lib/2.0/lib-2.0.jar",
        ]);

        let outcome = run(&config, "1\na\nyes\n");

        assert!(matches!(outcome, DeleteOutcome::Deleted(ref r) if r.len() == 2));
        assert!(Manifest::load(&config.manifest_file).jars.is_empty());
        assert!(!config.target_dir.join("com").exists());
    }

    #[test]
    fn test_delete_one_version_keeps_siblings() {
        let (_dir, config) = setup(&[
            "com/example/lib/1.0/lib-1.0.jar",
            "com/example/lib/2.0/lib-2.0.jar",
        ]);

        run(&config, "1\n1\ny\n");

        assert!(!config.target_dir.join("com/example/lib/1.0").exists());
        assert!(config.target_dir.join("com/example/lib/2.0/lib-2.0.jar").exists());
        let manifest = Manifest::load(&config.manifest_file);
        assert_eq!(manifest.jars.len(), 1);
        assert_eq!(manifest.jars[0].version, "2.0");
    }

    #[test]
    fn test_non_empty_ancestor_is_kept() {
        let (_dir, config) = setup(&[
            "com/example/lib/1.0/lib-1.0.jar",
            "com/example/other/3.0/other-3.0.jar",
        ]);

        run(&config, "1\ny\n");

        assert!(!config.target_dir.join("com/example/lib").exists());
        assert!(config.target_dir.join("com/example/other/3.0").exists());
    }

    #[test]
    fn test_records_sharing_a_version_dir_go_together() {
        let (_dir, config) = setup(&[
            "com/example/lib/1.0/lib-1.0.jar",
            "com/example/lib/1.0/lib-1.0-all.jar",
        ]);

        let outcome = run(&config, "1\ny\n");

        assert!(matches!(outcome, DeleteOutcome::Deleted(ref r) if r.len() == 2));
        assert!(Manifest::load(&config.manifest_file).jars.is_empty());
    }

    #[test]
    fn test_declined_confirmation_changes_nothing() {
        let (_dir, config) = setup(&["com/example/lib/1.0/lib-1.0.jar"]);
        let before = fs::read(&config.manifest_file).unwrap();

        let outcome = run(&config, "1\nn\n");

        assert!(matches!(outcome, DeleteOutcome::Cancelled));
        assert!(config.target_dir.join("com/example/lib/1.0/lib-1.0.jar").exists());
        assert_eq!(fs::read(&config.manifest_file).unwrap(), before);
    }

    #[test]
    fn test_blank_answer_cancels() {
        let (_dir, config) = setup(&["com/example/lib/1.0/lib-1.0.jar"]);
        assert!(matches!(run(&config, "\n"), DeleteOutcome::Cancelled));
    }

    #[test]
    fn test_invalid_selection_aborts_without_changes() {
        let (_dir, config) = setup(&[
            "com/example/lib/1.0/lib-1.0.jar",
            "com/example/lib/2.0/lib-2.0.jar",
        ]);
        let before = fs::read(&config.manifest_file).unwrap();

        let outcome = run(&config, "7\n");
        assert!(matches!(
            outcome,
            DeleteOutcome::Invalid(SelectionError::OutOfRange { choice: 7, max: 1 })
        ));

        let outcome = run(&config, "1\nlatest\n");
        assert!(matches!(
            outcome,
            DeleteOutcome::Invalid(SelectionError::NotANumber { .. })
        ));

        assert_eq!(fs::read(&config.manifest_file).unwrap(), before);
        assert!(config.target_dir.join("com/example/lib/2.0").exists());
    }

    #[test]
    fn test_nothing_tracked() {
        let dir = tempdir().unwrap();
        let config = Config::for_dirs(dir.path(), dir.path(), &dir.path().join("repository"));
        assert!(matches!(run(&config, ""), DeleteOutcome::NothingTracked));
    }

    #[test]
    fn test_version_dir_rejects_escaping_paths() {
        let root = Path::new("/repo");
        assert_eq!(
            version_dir(root, "g/a/1.0/a.jar"),
            Some(PathBuf::from("/repo/g/a/1.0"))
        );
        assert_eq!(version_dir(root, "../etc/passwd"), None);
        assert_eq!(version_dir(root, "/abs/a.jar"), None);
        assert_eq!(version_dir(root, "a.jar"), None);
    }

    #[test]
    fn test_prune_stops_at_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("repository");
        fs::create_dir_all(root.join("a/b/c")).unwrap();

        prune_empty_ancestors(&root.join("a/b/c"), &root).unwrap();

        assert!(root.is_dir());
        assert!(!root.join("a").exists());
    }
}
