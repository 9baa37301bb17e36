//! # release_flow
//!
//! Release workflow automation for a single project against a remote git host.
//!
//! One `commit` run provisions the remote repository, links and syncs the
//! local repository, works out the next version and its `develop/<version>`
//! branch, then commits and pushes. With `--publish` it also recreates the
//! `release/<version>` tag, merges the develop branch into trunk and removes it.
//!
//! ## Usage
//!
//! ```bash
//! release_flow commit              # commit and push the develop branch
//! release_flow commit --publish    # ...then tag, merge into trunk, clean up
//! release_flow commit --clear      # forget the cached remote account first
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod error;
pub mod git;
pub mod metadata;
pub mod prompt;
pub mod remote;
pub mod state;
pub mod version;
pub mod workflow;

pub use cli::Args;
pub use error::{ReleaseError, Result};
pub use git::{GitExecutor, SystemGit};
pub use remote::{HostClient, RemoteDescriptor, RemoteHost};
pub use version::{VersionBump, VersionState};
pub use workflow::{PipelineReport, Stage, WorkflowContext};

use remote::Platform;
use std::path::PathBuf;

/// Environment variable overriding the trunk branch
pub const TRUNK_ENV: &str = "RELEASE_FLOW_TRUNK";

/// Environment variable overriding the remote name
pub const REMOTE_ENV: &str = "RELEASE_FLOW_REMOTE";

/// Configuration for a workflow run
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Project root holding the package descriptor
    pub project_dir: PathBuf,
    /// Long-lived integration branch
    pub trunk: String,
    /// Remote every push and pull targets
    pub remote: String,
    /// Show verbose output and full error detail
    pub debug: bool,
    /// Access tokens found in the environment, per platform
    pub env_tokens: Vec<(Platform, String)>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            trunk: "main".to_string(),
            remote: "origin".to_string(),
            debug: false,
            env_tokens: Vec::new(),
        }
    }
}

impl ReleaseConfig {
    /// Defaults overridden by the process environment
    pub fn from_env(project_dir: PathBuf, debug: bool) -> Self {
        Self::from_lookup(project_dir, debug, |key| std::env::var(key).ok())
    }

    /// Defaults overridden through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(project_dir: PathBuf, debug: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let env_tokens = Platform::ALL
            .iter()
            .filter_map(|platform| {
                platform
                    .token_env_vars()
                    .iter()
                    .find_map(|key| set(*key))
                    .map(|token| (*platform, token))
            })
            .collect();

        Self {
            project_dir,
            trunk: set(TRUNK_ENV).unwrap_or(defaults.trunk),
            remote: set(REMOTE_ENV).unwrap_or(defaults.remote),
            debug,
            env_tokens,
        }
    }

    /// Token for `platform` taken from the environment
    pub fn env_token(&self, platform: Platform) -> Option<&str> {
        self.env_tokens
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, token)| token.as_str())
    }
}
