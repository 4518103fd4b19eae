//! Terminal interaction, behind traits so orchestrators can run unattended.
//!
//! - [`Operator`] asks free-text and yes/no questions
//! - [`MetadataProvider`] turns a new artifact into a [`Provenance`](crate::artifact::Provenance)

pub mod metadata;
pub mod operator;

pub use metadata::{
    ArtifactPrompt, FnProvider, MetadataProvider, PromptingProvider, SkipProvider, from_fn,
};
pub use operator::{LineOperator, Operator, TerminalOperator, is_affirmative, terminal_operator};
