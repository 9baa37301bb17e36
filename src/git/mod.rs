//! Git integration for the release workflow.
//!
//! The workflow talks to git exclusively through the [`GitExecutor`] trait;
//! [`SystemGit`] implements it by running the git binary.

mod operations;
mod status;
mod system;

pub use operations::{GitExecutor, MergeOutcome, RenamedPath, WorkingTreeStatus};
pub use status::parse_porcelain;
pub use system::SystemGit;
