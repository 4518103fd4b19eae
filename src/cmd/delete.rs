//! `m2sync delete` — interactive removal of artifact versions.

use anyhow::Result;

use m2sync::config::Config;
use m2sync::delete::DeleteOrchestrator;
use m2sync::prompt::terminal_operator;

pub fn cmd_delete(config: &Config) -> Result<()> {
    let mut operator = terminal_operator();
    // Cancelled and invalid selections have already been reported; they are not failures.
    DeleteOrchestrator::new(config).run(operator.as_mut())?;
    Ok(())
}
