//! Target version and develop branch resolution.

use crate::error::Result;
use crate::git::GitExecutor;
use crate::metadata::{PackageDescriptor, ProjectIdentity};
use crate::prompt::{Prompter, select_value};
use crate::version::tags::{RefKind, develop_branch, parse_versions};
use crate::version::VersionBump;
use crate::workflow::WorkflowContext;
use semver::Version;

/// Versions and branch a run works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionState {
    /// Version read from the package descriptor
    pub develop_version: Version,
    /// Newest `release/<semver>` tag on the remote
    pub release_version: Option<Version>,
    /// Version this run commits and (optionally) publishes
    pub version: Version,
    /// Always `develop/<version>`
    pub branch: String,
}

/// What to do given the local and latest released versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchDecision {
    /// Keep working on the descriptor's version
    UseDevelop,
    /// The latest release is not behind; increment from it
    Increment {
        /// Latest released version
        from: Version,
    },
}

/// Nothing released yet, or local strictly ahead, keeps the local version
pub fn decide(develop: &Version, release: Option<&Version>) -> BranchDecision {
    match release {
        None => BranchDecision::UseDevelop,
        Some(release) if develop > release => BranchDecision::UseDevelop,
        Some(release) => BranchDecision::Increment {
            from: release.clone(),
        },
    }
}

/// Newest release tag advertised by the remote
pub async fn latest_release<G: GitExecutor>(git: &G, remote: &str) -> Result<Option<Version>> {
    let refs = git.list_remote_refs(remote).await?;
    let releases = parse_versions(refs.iter().map(String::as_str), RefKind::ReleaseTag);
    log::debug!("remote release versions: {releases:?}");
    Ok(releases.into_iter().next())
}

/// Ask which increment to apply to `release`; `patch` is the default
pub fn prompt_bump<P: Prompter + ?Sized>(prompter: &P, release: &Version) -> Result<VersionBump> {
    // Increments that would overflow a component are not offered
    let choices: Vec<(String, VersionBump)> = VersionBump::ALL
        .iter()
        .filter_map(|bump| {
            let next = bump.apply(release).ok()?;
            Some((format!("{bump} ({release} -> {next})"), *bump))
        })
        .collect();
    select_value(prompter, "Select the version increment", &choices, 0)
}

/// Work out the version and branch for this run
///
/// When an increment is chosen the new version is written back to the
/// package descriptor, unless it already holds that version.
pub async fn resolve<G, P, D>(
    ctx: &WorkflowContext<'_, G, P>,
    descriptor: &D,
    identity: &ProjectIdentity,
) -> Result<VersionState>
where
    G: GitExecutor,
    P: Prompter,
    D: PackageDescriptor,
{
    ctx.output.progress("Resolving working branch...");

    let develop_version = identity.version.clone();
    let release_version = latest_release(ctx.git, &ctx.config.remote).await?;

    let version = match decide(&develop_version, release_version.as_ref()) {
        BranchDecision::UseDevelop => {
            if let Some(release) = &release_version {
                ctx.output.info(&format!(
                    "Local version is ahead of the latest release ({develop_version} > {release})"
                ));
            }
            develop_version.clone()
        }
        BranchDecision::Increment { from } => {
            ctx.output.info(&format!(
                "Latest release {from} is not behind local version {develop_version}"
            ));
            let bump = prompt_bump(ctx.prompter, &from)?;
            let next = bump.apply(&from)?;
            if next != develop_version {
                descriptor.write_version(&next)?;
                ctx.output.verbose(&format!(
                    "Updated {} to version {next}",
                    descriptor.path().display()
                ));
            }
            next
        }
    };

    let branch = develop_branch(&version);
    ctx.output.success(&format!("Working branch: {branch}"));

    Ok(VersionState {
        develop_version,
        release_version,
        version,
        branch,
    })
}
