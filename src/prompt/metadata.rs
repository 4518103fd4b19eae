//! Collecting provenance for newly discovered artifacts.

use anyhow::Result;
use console::style;

use super::operator::Operator;
use crate::artifact::Provenance;
use crate::ui::icons::FILE_NEW;

/// The artifact a provider is asked about.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactPrompt<'a> {
    pub file_name: &'a str,
    /// Path inside the repository root
    pub rel_path: &'a str,
}

/// Supplies provenance for an artifact not yet in the manifest.
pub trait MetadataProvider {
    fn provide(&mut self, artifact: &ArtifactPrompt<'_>) -> Result<Provenance>;
}

/// Adapts a closure into a [`MetadataProvider`].
pub fn from_fn<F>(f: F) -> FnProvider<F>
where
    F: FnMut(&ArtifactPrompt<'_>) -> Result<Provenance>,
{
    FnProvider(f)
}

pub struct FnProvider<F>(F);

impl<F> MetadataProvider for FnProvider<F>
where
    F: FnMut(&ArtifactPrompt<'_>) -> Result<Provenance>,
{
    fn provide(&mut self, artifact: &ArtifactPrompt<'_>) -> Result<Provenance> {
        (self.0)(artifact)
    }
}

/// Records every new artifact as skipped without asking.
pub struct SkipProvider;

impl MetadataProvider for SkipProvider {
    fn provide(&mut self, artifact: &ArtifactPrompt<'_>) -> Result<Provenance> {
        tracing::debug!(path = artifact.rel_path, "recording artifact without provenance");
        Ok(Provenance::skipped())
    }
}

/// Asks the operator for repository, branch and commit.
///
/// A blank repository skips the artifact. Whatever else is typed is stored as-is.
pub struct PromptingProvider<O> {
    operator: O,
}

impl<O: Operator> PromptingProvider<O> {
    pub fn new(operator: O) -> Self {
        Self { operator }
    }
}

impl<O: Operator> MetadataProvider for PromptingProvider<O> {
    fn provide(&mut self, artifact: &ArtifactPrompt<'_>) -> Result<Provenance> {
        println!();
        println!("{}New artifact: {}", FILE_NEW, style(artifact.file_name).bold());
        println!("Path: {}", style(artifact.rel_path).dim());

        let repo = self
            .operator
            .input("  GitHub repo (e.g. user/repo, or blank to skip)")?;
        if repo.is_empty() {
            return Ok(Provenance::skipped());
        }

        let branch = self.operator.input("  Branch")?;
        let commit = self.operator.input("  Commit hash")?;
        Ok(Provenance {
            repo,
            branch,
            commit,
        })
    }
}
