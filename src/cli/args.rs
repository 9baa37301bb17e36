//! Command line argument parsing.

use crate::ReleaseConfig;
use crate::cli::OutputManager;
use crate::error::{CliError, Result};
use clap::{Parser, Subcommand};

/// Release workflow automation against GitHub or Gitee
#[derive(Parser, Debug)]
#[command(
    name = "release_flow",
    version,
    about = "Release workflow automation against GitHub or Gitee",
    long_about = "Provision the remote repository, sync the local one, work out the next \
version and push a develop/<version> branch. With --publish, also tag release/<version> \
and merge the branch into trunk.

Usage:
  release_flow commit
  release_flow commit --publish
  release_flow -d commit --clear"
)]
pub struct Args {
    /// Verbose output and full error detail
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Commit pending work on the develop branch and push it
    Commit {
        /// Forget the cached remote account before running
        #[arg(short = 'c', long)]
        clear: bool,

        /// Tag the release, merge into trunk and delete the develop branch
        #[arg(short = 'p', long)]
        publish: bool,
    },
}

impl Command {
    /// Command name as typed
    pub fn name(&self) -> &'static str {
        match self {
            Command::Commit { .. } => "commit",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug)]
pub struct RuntimeConfig {
    release: ReleaseConfig,
    output: OutputManager,
}

impl RuntimeConfig {
    /// Configuration for running in the current directory
    pub fn from_args(args: &Args) -> Result<Self> {
        let project_dir = std::env::current_dir().map_err(|e| CliError::InvalidArguments {
            reason: format!("cannot read the current directory: {e}"),
        })?;
        Ok(Self {
            release: ReleaseConfig::from_env(project_dir, args.debug),
            output: OutputManager::new(args.debug, false),
        })
    }

    /// Workflow configuration
    pub fn release(&self) -> &ReleaseConfig {
        &self.release
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &OutputManager {
        &self.output
    }
}
