pub mod artifact;
pub mod config;
pub mod delete;
pub mod errors;
pub mod m2sync_config;
pub mod manifest;
pub mod mirror;
pub mod prompt;
pub mod scanner;
pub mod sync;
pub mod tree;
pub mod ui;
pub mod util;
