use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

use crate::m2sync_config::M2SyncToml;
use crate::mirror::MirrorBackend;
use crate::util::expand_home;

/// Command-line values that take precedence over `m2sync.toml` and the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub mirror: Option<MirrorBackend>,
}

/// The auxiliary file copied into the project directory on sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePaths {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// Runtime configuration, resolved to absolute paths.
///
/// Orchestrators receive this explicitly; nothing reads paths from globals.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub manifest_file: PathBuf,
    pub tree_file: PathBuf,
    pub bundle: Option<BundlePaths>,
    pub mirror_backend: MirrorBackend,
    pub rsync_cmd: String,
}

impl Config {
    /// Resolve configuration for `project_dir` (file → environment → CLI).
    pub fn new(project_dir: PathBuf, overrides: &ConfigOverrides) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;

        let toml = match &overrides.config_file {
            Some(path) => M2SyncToml::load(&resolve(&project_dir, path))?,
            None => M2SyncToml::load_or_default(&project_dir)?,
        };
        for warning in toml.validate() {
            tracing::warn!("config: {}", warning);
        }

        let source_dir = match &overrides.source {
            Some(path) => resolve(&project_dir, path),
            None => resolve(&project_dir, &expand_home(&toml.source())),
        };
        let target_dir = match &overrides.target {
            Some(path) => resolve(&project_dir, path),
            None => resolve(&project_dir, &expand_home(&toml.target())),
        };
        let manifest_file = resolve(&project_dir, &expand_home(&toml.paths.manifest));
        let tree_file = resolve(&project_dir, &expand_home(&toml.paths.tree));

        let bundle = match (&toml.bundle.source, toml.bundle.enabled) {
            (Some(raw), true) if !raw.trim().is_empty() => {
                let source = resolve(&project_dir, &expand_home(raw));
                let dest = match &toml.bundle.dest {
                    Some(dest) => resolve(&project_dir, &expand_home(dest)),
                    None => match source.file_name() {
                        Some(name) => project_dir.join(name),
                        None => anyhow::bail!("bundle.source has no file name: {}", raw),
                    },
                };
                Some(BundlePaths { source, dest })
            }
            _ => None,
        };

        Ok(Self {
            project_dir,
            source_dir,
            target_dir,
            manifest_file,
            tree_file,
            bundle,
            mirror_backend: overrides.mirror.unwrap_or(toml.mirror.backend),
            rsync_cmd: toml.rsync_cmd(),
        })
    }

    /// Configuration with default file names under `project_dir` and no bundle.
    pub fn for_dirs(project_dir: &Path, source_dir: &Path, target_dir: &Path) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            source_dir: source_dir.to_path_buf(),
            target_dir: target_dir.to_path_buf(),
            manifest_file: project_dir.join("manifest.json"),
            tree_file: project_dir.join("repository-tree.json"),
            bundle: None,
            mirror_backend: MirrorBackend::Builtin,
            rsync_cmd: "rsync".to_string(),
        }
    }

    /// Prefix for manifest paths: the target directory as seen from the manifest's directory.
    ///
    /// Climbs with `..` when the target is a sibling. A target sharing nothing
    /// below the filesystem root is named by its last component.
    pub fn manifest_prefix(&self) -> String {
        let base = self.manifest_file.parent().unwrap_or(self.project_dir.as_path());
        let target: Vec<Component> = self.target_dir.components().collect();
        let base: Vec<Component> = base.components().collect();

        let common = target
            .iter()
            .zip(&base)
            .take_while(|(a, b)| a == b)
            .count();
        let shares_dir = target[..common]
            .iter()
            .any(|c| matches!(c, Component::Normal(_)));
        if !shares_dir {
            return file_name(&self.target_dir);
        }

        let mut parts: Vec<String> = base[common..].iter().map(|_| "..".to_string()).collect();
        parts.extend(
            target[common..]
                .iter()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        );
        if parts.is_empty() {
            file_name(&self.target_dir)
        } else {
            parts.join("/")
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    normalize(&joined)
}

/// Fold `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_config_defaults_resolve_under_project_dir() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path().to_path_buf(), &ConfigOverrides::default()).unwrap();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(config.target_dir, root.join("repository"));
        assert_eq!(config.manifest_file, root.join("manifest.json"));
        assert_eq!(config.tree_file, root.join("repository-tree.json"));
        assert_eq!(config.manifest_prefix(), "repository");
        let bundle = config.bundle.unwrap();
        assert_eq!(bundle.dest, root.join("ornithe-prism-instance.zip"));
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("m2sync.toml"),
            "[paths]\ntarget = \"from-file\"\n[mirror]\nbackend = \"rsync\"\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            target: Some(PathBuf::from("libs/maven")),
            mirror: Some(MirrorBackend::Builtin),
            ..Default::default()
        };
        let config = Config::new(dir.path().to_path_buf(), &overrides).unwrap();

        assert!(config.target_dir.ends_with("libs/maven"));
        assert_eq!(config.manifest_prefix(), "libs/maven");
        assert_eq!(config.mirror_backend, MirrorBackend::Builtin);
    }

    #[test]
    fn test_file_settings_apply() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("m2sync.toml"),
            "[paths]\ntarget = \"from-file\"\n[bundle]\nenabled = false\n",
        )
        .unwrap();
        let config = Config::new(dir.path().to_path_buf(), &ConfigOverrides::default()).unwrap();
        assert!(config.target_dir.ends_with("from-file"));
        assert!(config.bundle.is_none());
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let dir = tempdir().unwrap();
        let overrides = ConfigOverrides {
            config_file: Some(PathBuf::from("missing.toml")),
            ..Default::default()
        };
        assert!(Config::new(dir.path().to_path_buf(), &overrides).is_err());
    }

    #[test]
    fn test_missing_project_dir_fails() {
        let dir = tempdir().unwrap();
        let result = Config::new(dir.path().join("nope"), &ConfigOverrides::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_sibling_target_climbs_out_of_project() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let overrides = ConfigOverrides {
            target: Some(PathBuf::from("../shared/repository")),
            ..Default::default()
        };
        let config = Config::new(project, &overrides).unwrap();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(config.target_dir, root.join("shared/repository"));
        assert_eq!(config.manifest_prefix(), "../shared/repository");

        let record = crate::artifact::ArtifactRecord::from_relative(
            "g/a/1/a-1.jar",
            &config.manifest_prefix(),
            crate::artifact::Provenance::skipped(),
        )
        .unwrap();
        assert_eq!(
            normalize(&config.project_dir.join(&record.path)),
            config.target_dir.join("g/a/1/a-1.jar")
        );
    }

    #[test]
    fn test_prefix_is_relative_to_manifest_directory() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("m2sync.toml"),
            "[paths]\nmanifest = \"meta/manifest.json\"\n",
        )
        .unwrap();
        let config = Config::new(dir.path().to_path_buf(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.manifest_prefix(), "../repository");
    }

    #[test]
    fn test_normalize_folds_dots() {
        assert_eq!(normalize(Path::new("/a/b/./../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize(Path::new("../../x")), PathBuf::from("../../x"));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
    }

    #[test]
    fn test_manifest_prefix_for_outside_target() {
        let config = Config::for_dirs(
            Path::new("/work/project"),
            Path::new("/home/me/.m2/repository"),
            Path::new("/srv/mirror/repository"),
        );
        assert_eq!(config.manifest_prefix(), "repository");
    }
}
