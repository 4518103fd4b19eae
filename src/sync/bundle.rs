//! One-time copy of the auxiliary bundle into the project directory.

use anyhow::{Context, Result};

use crate::config::BundlePaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleOutcome {
    Copied,
    /// The destination exists; it is never overwritten.
    AlreadyPresent,
    SourceMissing,
    /// No bundle configured.
    Disabled,
    /// The copy itself failed; reported and otherwise ignored.
    Failed,
}

/// Copy the bundle if the destination is missing and the source exists.
pub fn copy_bundle(bundle: Option<&BundlePaths>) -> Result<BundleOutcome> {
    let Some(bundle) = bundle else {
        return Ok(BundleOutcome::Disabled);
    };

    if !bundle.source.exists() {
        tracing::debug!(source = %bundle.source.display(), "bundle source missing");
        return Ok(BundleOutcome::SourceMissing);
    }
    if bundle.dest.exists() {
        tracing::debug!(dest = %bundle.dest.display(), "bundle already copied");
        return Ok(BundleOutcome::AlreadyPresent);
    }

    std::fs::copy(&bundle.source, &bundle.dest).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            bundle.source.display(),
            bundle.dest.display()
        )
    })?;
    Ok(BundleOutcome::Copied)
}
