//! Command dispatch.
//!
//! Every command passes through [`preflight`] before its action runs.

mod commit;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{GitError, Result};

use commit::execute_commit;

/// Checks shared by all commands
fn preflight(config: &RuntimeConfig) -> Result<()> {
    let git = which::which("git").map_err(|_| GitError::GitNotInstalled)?;
    log::debug!("using git at {}", git.display());
    config
        .output()
        .verbose(&format!("Project directory: {}", config.release().project_dir.display()));
    Ok(())
}

/// Execute the command named by `args`
pub async fn execute_command(args: Args) -> Result<i32> {
    let config = RuntimeConfig::from_args(&args)?;
    preflight(&config)?;
    log::debug!("running {}", args.command.name());

    match &args.command {
        Command::Commit { clear, publish } => execute_commit(&config, *clear, *publish).await,
    }
}
