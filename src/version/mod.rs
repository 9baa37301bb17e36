//! Version management for the release workflow.
//!
//! Parses versions out of remote ref names, applies semantic increments, and
//! decides which `develop/<version>` branch a run works on.

mod bumper;
mod resolver;
pub mod tags;

pub use bumper::VersionBump;
pub use resolver::{BranchDecision, VersionState, decide, latest_release, prompt_bump, resolve};
pub use tags::{RefKind, develop_branch, parse_versions, release_tag};
