//! Error types for release_flow operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release_flow operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release_flow operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Version management errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Git operation errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Remote host API errors
    #[error("Remote host error: {0}")]
    Remote(#[from] RemoteError),

    /// Interactive prompt errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// Package descriptor errors
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Cached state errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Version management errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// Version parsing failed
    #[error("Failed to parse version '{version}': {source}")]
    ParseFailed {
        /// Version string
        version: String,
        /// Parsing error
        #[source]
        source: semver::Error,
    },

    /// Incrementing would overflow a version component
    #[error("Cannot apply a {bump} increment to {version}: component overflow")]
    Overflow {
        /// Version being incremented
        version: String,
        /// Bump type
        bump: String,
    },
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// git binary could not be located
    #[error("git executable not found on PATH")]
    GitNotInstalled,

    /// Unresolved merge conflicts in the working tree
    #[error("Working tree has unresolved conflicts in {paths:?}. Resolve and commit them manually, then re-run.")]
    Conflict {
        /// Conflicted paths
        paths: Vec<String>,
    },

    /// Pull target ref is missing on the remote
    #[error("Remote '{remote}' has no branch '{branch}'")]
    RemoteRefMissing {
        /// Remote name
        remote: String,
        /// Branch that could not be found
        branch: String,
    },

    /// A git command exited unsuccessfully
    #[error("git {command} failed: {reason}")]
    CommandFailed {
        /// Subcommand and arguments
        command: String,
        /// stderr or a description of the failure
        reason: String,
    },

    /// Porcelain output could not be interpreted
    #[error("Unexpected git output for {command}: {output}")]
    UnexpectedOutput {
        /// Subcommand that produced the output
        command: String,
        /// Offending output fragment
        output: String,
    },
}

/// Remote host API errors
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Token rejected by the host
    #[error("Authentication with {platform} failed. Check the access token.")]
    AuthenticationFailed {
        /// Platform name
        platform: String,
    },

    /// Host rate limit hit
    #[error("{platform} rate limit exceeded")]
    RateLimited {
        /// Platform name
        platform: String,
    },

    /// Non-success response from the host
    #[error("{platform} API request {method} {url} failed with status {status}: {body}")]
    RequestFailed {
        /// Platform name
        platform: String,
        /// HTTP method
        method: String,
        /// Request URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Transport-level failure
    #[error("Network error talking to {platform}: {source}")]
    Network {
        /// Platform name
        platform: String,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// Could not determine the account to create repositories under
    #[error("Could not determine a login name for the selected account")]
    MissingLogin,
}

/// Interactive prompt errors
#[derive(Error, Debug)]
pub enum PromptError {
    /// Terminal interaction failed
    #[error("Prompt '{prompt}' failed: {reason}")]
    Interaction {
        /// Prompt text
        prompt: String,
        /// Reason for the error
        reason: String,
    },

    /// Selection offered with nothing to choose
    #[error("No choices available for '{prompt}'")]
    NoChoices {
        /// Prompt text
        prompt: String,
    },
}

/// Package descriptor errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Neither Cargo.toml nor package.json present
    #[error("No package descriptor (Cargo.toml or package.json) found in {dir}")]
    NotFound {
        /// Project directory
        dir: PathBuf,
    },

    /// Descriptor lacks a package name
    #[error("Package descriptor {path} has no name")]
    MissingName {
        /// Descriptor path
        path: PathBuf,
    },

    /// Descriptor could not be parsed or rewritten
    #[error("Failed to process {path}: {reason}")]
    Invalid {
        /// Descriptor path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// Cached state errors
#[derive(Error, Debug)]
pub enum StateError {
    /// Home directory unavailable
    #[error("Could not determine home directory for the cache")]
    NoHomeDir,

    /// Failed to save state
    #[error("Failed to save state to {path}: {reason}")]
    SaveFailed {
        /// Cache file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Git(GitError::Conflict { paths }) => vec![
                format!("Resolve conflicts in: {}", paths.join(", ")),
                "Stage and commit the resolution: git add <paths> && git commit".to_string(),
                "Re-run the commit command".to_string(),
            ],
            ReleaseError::Git(GitError::GitNotInstalled) => {
                vec!["Install git and make sure it is on PATH".to_string()]
            }
            ReleaseError::Git(GitError::RemoteRefMissing { remote, branch }) => vec![
                format!("Check the branch exists: git ls-remote --heads {} {}", remote, branch),
            ],
            ReleaseError::Remote(RemoteError::AuthenticationFailed { .. }) => vec![
                "Reset the cached token with --clear and enter a new one".to_string(),
                "Or export GITHUB_TOKEN / GITEE_TOKEN".to_string(),
            ],
            ReleaseError::Remote(RemoteError::RateLimited { .. }) => {
                vec!["Wait for the rate limit window to reset, then retry".to_string()]
            }
            ReleaseError::Manifest(ManifestError::NotFound { .. }) => {
                vec!["Run from the project root containing Cargo.toml or package.json".to_string()]
            }
            _ => Vec::new(),
        }
    }

    /// Whether this error is the "pull target missing on remote" precondition failure
    pub fn is_remote_ref_missing(&self) -> bool {
        matches!(self, ReleaseError::Git(GitError::RemoteRefMissing { .. }))
    }
}
