//! The `sync` pipeline.
//!
//! 1. Mirror the Maven cache into the repository (failure is reported, not fatal)
//! 2. Copy the auxiliary bundle once
//! 3. Load provenance already recorded in the manifest
//! 4. Scan the repository for artifacts
//! 5. Ask for provenance of artifacts the manifest does not know
//! 6. Rewrite the manifest from the scan and regenerate the tree snapshot
//!
//! The manifest is rebuilt from the scan on every run, so entries whose files
//! disappeared are dropped and a second run with no changes writes the same bytes.

pub mod bundle;

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::artifact::{ArtifactRecord, Coordinates, Provenance, relative_path};
use crate::config::Config;
use crate::manifest::Manifest;
use crate::mirror::{Mirror, MirrorStats, mirror_for};
use crate::prompt::{ArtifactPrompt, MetadataProvider};
use crate::scanner::scan_artifacts;
use crate::tree::write_snapshot;
use crate::ui;

pub use bundle::{BundleOutcome, copy_bundle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    Completed(MirrorStats),
    /// The mirror failed; the rest of the sync still ran.
    Failed(String),
}

/// What a sync run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub mirror: MirrorOutcome,
    pub bundle: BundleOutcome,
    /// Artifacts the manifest did not know before this run
    pub new_artifacts: usize,
    pub total_artifacts: usize,
}

pub struct SyncOrchestrator<'a> {
    config: &'a Config,
    mirror: Box<dyn Mirror>,
}

impl<'a> SyncOrchestrator<'a> {
    /// Orchestrator using the configured mirror backend.
    pub fn new(config: &'a Config) -> Self {
        let mirror = mirror_for(config.mirror_backend, &config.rsync_cmd);
        Self { config, mirror }
    }

    pub fn with_mirror(config: &'a Config, mirror: Box<dyn Mirror>) -> Self {
        Self { config, mirror }
    }

    pub fn run(&self, provider: &mut dyn MetadataProvider) -> Result<SyncReport> {
        let config = self.config;

        ui::step("Syncing Maven repository...");
        let mirror = self.mirror_repository();

        ui::step("Copying bundle...");
        let bundle = match copy_bundle(config.bundle.as_ref()) {
            Ok(outcome) => {
                report_bundle(outcome);
                outcome
            }
            Err(e) => {
                ui::warning(format!("Bundle copy failed: {:#}", e));
                BundleOutcome::Failed
            }
        };

        std::fs::create_dir_all(&config.target_dir).with_context(|| {
            format!(
                "Failed to create repository directory: {}",
                config.target_dir.display()
            )
        })?;

        let prefix = config.manifest_prefix();
        let known = Manifest::load(&config.manifest_file).metadata(&prefix);

        ui::step("Collecting metadata for artifacts...");
        let artifacts = scan_artifacts(&config.target_dir)?;
        let (records, new_artifacts) =
            build_records(&config.target_dir, &prefix, &artifacts, &known, provider)?;
        let total_artifacts = records.len();

        ui::step(format!("Generating {}...", display_name(&config.manifest_file)));
        Manifest::new(records).save(&config.manifest_file)?;

        ui::step(format!("Generating {}...", display_name(&config.tree_file)));
        write_snapshot(&config.target_dir, &config.tree_file)?;

        tracing::info!(total = total_artifacts, new = new_artifacts, "sync complete");
        Ok(SyncReport {
            mirror,
            bundle,
            new_artifacts,
            total_artifacts,
        })
    }

    fn mirror_repository(&self) -> MirrorOutcome {
        let config = self.config;
        tracing::info!(
            backend = self.mirror.name(),
            source = %config.source_dir.display(),
            target = %config.target_dir.display(),
            "mirroring"
        );

        let spinner = ui::spinner(format!(
            "{} → {}",
            config.source_dir.display(),
            config.target_dir.display()
        ));
        let result = self.mirror.mirror(&config.source_dir, &config.target_dir);
        spinner.finish_and_clear();

        match result {
            Ok(stats) => {
                match stats.copied {
                    Some(n) => ui::note(format!("{} new file(s) copied", n)),
                    None => ui::note("Mirror complete"),
                }
                MirrorOutcome::Completed(stats)
            }
            Err(e) => {
                ui::failure(format!("Mirror failed: {}", e));
                tracing::warn!(error = %e, "mirror failed, continuing with local repository");
                MirrorOutcome::Failed(e.to_string())
            }
        }
    }
}

fn report_bundle(outcome: BundleOutcome) {
    match outcome {
        BundleOutcome::Copied => ui::success("Bundle copied"),
        BundleOutcome::AlreadyPresent => ui::note("Bundle already exists"),
        BundleOutcome::SourceMissing => ui::warning("Bundle not found"),
        BundleOutcome::Disabled => ui::note("No bundle configured"),
        BundleOutcome::Failed => {}
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Turn scanned artifact paths into manifest records.
///
/// Every path is checked against the layout contract before anyone is
/// prompted. Known paths keep their recorded provenance; unknown ones are
/// passed to `provider` once each, in scan order. Returns the records and
/// how many were new.
pub fn build_records(
    root: &std::path::Path,
    prefix: &str,
    artifacts: &[PathBuf],
    known: &BTreeMap<String, Provenance>,
    provider: &mut dyn MetadataProvider,
) -> Result<(Vec<ArtifactRecord>, usize)> {
    let mut located = Vec::with_capacity(artifacts.len());
    for path in artifacts {
        let rel = relative_path(root, path)?;
        Coordinates::from_relative(&rel)?;
        located.push((path, rel));
    }

    let mut records = Vec::with_capacity(located.len());
    let mut new_artifacts = 0;
    for (path, rel) in located {
        let provenance = match known.get(&rel) {
            Some(provenance) => provenance.clone(),
            None => {
                new_artifacts += 1;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                provider.provide(&ArtifactPrompt {
                    file_name: &file_name,
                    rel_path: &rel,
                })?
            }
        };
        records.push(ArtifactRecord::from_relative(&rel, prefix, provenance)?);
    }

    Ok((records, new_artifacts))
}
