//! Typed errors for the conditions callers match on.
//!
//! - `LayoutError` — an artifact file that breaks the group/artifact/version layout
//! - `SelectionError` — operator input that does not name a listed entry
//! - `MirrorError` — failures of the mirror collaborator
//!
//! Everything else flows through `anyhow` with context attached at the I/O boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from deriving coordinates out of an artifact's location.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(
        "Artifact {path} must sit at least three directories below the repository root (<group>/<artifact>/<version>/<file>)"
    )]
    TooShallow { path: String },

    #[error("Artifact {path} is not inside the repository root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Artifact path {path} is not valid UTF-8")]
    NonUtf8 { path: PathBuf },
}

/// Errors from parsing an answer to an enumerated prompt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{input}' is not a number")]
    NotANumber { input: String },

    #[error("{choice} is out of range (expected 1-{max})")]
    OutOfRange { choice: usize, max: usize },

    #[error("No selection given")]
    Empty,
}

/// Errors from the mirror collaborator.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Source directory {path} does not exist")]
    SourceMissing { path: PathBuf },

    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with status {code}")]
    ExitStatus { command: String, code: i32 },

    #[error("Copy failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
