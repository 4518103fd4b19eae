use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m2sync::config::{Config, ConfigOverrides};
use m2sync::mirror::MirrorBackend;

mod cmd;

#[derive(Parser)]
#[command(name = "m2sync")]
#[command(
    version,
    about = "Mirror a local Maven cache into the project and track artifact provenance"
)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Config file (defaults to m2sync.toml in the project directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maven cache to mirror from. Overrides m2sync.toml and M2SYNC_SOURCE.
    #[arg(long, global = true)]
    pub source: Option<PathBuf>,

    /// Repository directory to mirror into. Overrides m2sync.toml and M2SYNC_TARGET.
    #[arg(long, global = true)]
    pub target: Option<PathBuf>,

    /// Mirror backend: rsync, builtin
    #[arg(long, global = true)]
    pub mirror: Option<MirrorBackend>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mirror artifacts, collect provenance, regenerate manifest and tree (default)
    Sync {
        /// Record new artifacts without provenance instead of prompting
        #[arg(long)]
        non_interactive: bool,
    },
    /// Interactively delete tracked artifact versions
    Delete,
    /// List tracked artifacts by coordinate
    List,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => e.exit(),
            _ => {
                e.print().ok();
                println!();
                println!("Recognized commands:");
                println!("  sync     (default) mirror artifacts and regenerate manifest and tree");
                println!("  delete   interactively delete tracked artifact versions");
                println!("  list     list tracked artifacts");
                return Ok(());
            }
        },
    };

    init_tracing(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let overrides = ConfigOverrides {
        config_file: cli.config.clone(),
        source: cli.source.clone(),
        target: cli.target.clone(),
        mirror: cli.mirror,
    };
    let config = Config::new(project_dir, &overrides)?;

    match cli.command {
        None => cmd::cmd_sync(&config, false)?,
        Some(Commands::Sync { non_interactive }) => cmd::cmd_sync(&config, non_interactive)?,
        Some(Commands::Delete) => cmd::cmd_delete(&config)?,
        Some(Commands::List) => cmd::cmd_list(&config)?,
    }

    Ok(())
}
