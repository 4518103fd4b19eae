//! `m2sync list` — tracked artifacts grouped by coordinate.

use anyhow::Result;
use console::style;

use m2sync::config::Config;
use m2sync::manifest::{Manifest, group_by_coordinate};
use m2sync::ui::icons::FOLDER;

pub fn cmd_list(config: &Config) -> Result<()> {
    let manifest = Manifest::load(&config.manifest_file);
    let groups = group_by_coordinate(&manifest.jars);

    println!();
    if groups.is_empty() {
        println!("No artifacts tracked.");
        println!();
        println!("Run 'm2sync sync' to populate {}.", config.manifest_file.display());
        println!();
        return Ok(());
    }

    let mut version_count = 0;
    for group in &groups {
        println!("{}{}", FOLDER, style(group.coordinate()).bold());
        for entry in &group.versions {
            version_count += 1;
            let sources: Vec<String> = entry
                .records
                .iter()
                .filter(|r| !r.provenance.is_skipped())
                .map(|r| {
                    let mut source = r.provenance.repo.clone();
                    if !r.provenance.branch.is_empty() {
                        source.push('@');
                        source.push_str(&r.provenance.branch);
                    }
                    if !r.provenance.commit.is_empty() {
                        source.push_str(&format!(" ({})", r.provenance.commit));
                    }
                    source
                })
                .collect();

            if sources.is_empty() {
                println!("  - {}", entry.version);
            } else {
                println!(
                    "  - {} {}",
                    entry.version,
                    style(sources.join(", ")).dim()
                );
            }
        }
    }

    println!();
    println!(
        "{} artifact(s), {} version(s)",
        groups.len(),
        version_count
    );
    println!();
    Ok(())
}
