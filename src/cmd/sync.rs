//! `m2sync sync` — mirror, collect provenance, regenerate manifest and tree.

use anyhow::Result;

use m2sync::config::Config;
use m2sync::prompt::{MetadataProvider, PromptingProvider, SkipProvider, terminal_operator};
use m2sync::sync::{MirrorOutcome, SyncOrchestrator};
use m2sync::ui::{self, icons::SPARKLE};

pub fn cmd_sync(config: &Config, non_interactive: bool) -> Result<()> {
    let mut provider: Box<dyn MetadataProvider> = if non_interactive {
        Box::new(SkipProvider)
    } else {
        Box::new(PromptingProvider::new(terminal_operator()))
    };

    let report = SyncOrchestrator::new(config).run(provider.as_mut())?;

    println!();
    println!(
        "{}Done! {} artifact(s) tracked, {} new.",
        SPARKLE, report.total_artifacts, report.new_artifacts
    );
    if let MirrorOutcome::Failed(reason) = &report.mirror {
        ui::warning(format!(
            "The mirror step failed ({}); the manifest reflects the repository as it was.",
            reason
        ));
    }
    Ok(())
}
