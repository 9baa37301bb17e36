//! Commit, integrate and push the develop branch.

use crate::error::Result;
use crate::git::{GitExecutor, MergeOutcome};
use crate::prompt::Prompter;
use crate::remote::RemoteDescriptor;
use crate::version::VersionState;
use crate::workflow::{WorkflowContext, advertises_branch, commit_pending, ensure_no_conflicts};

/// Check out `branch`, creating it from HEAD when it does not exist locally
pub async fn checkout_branch<G: GitExecutor>(git: &G, branch: &str) -> Result<()> {
    let local = git.local_branches().await?;
    if local.iter().any(|b| b == branch) {
        git.checkout(branch).await
    } else {
        log::debug!("creating branch {branch}");
        git.checkout_new(branch).await
    }
}

async fn pull_checked<G, P>(ctx: &WorkflowContext<'_, G, P>, branch: &str) -> Result<()>
where
    G: GitExecutor,
{
    let remote = ctx.config.remote.as_str();
    ctx.output.progress(&format!("Pulling {remote}/{branch}..."));
    if ctx.git.pull(remote, branch, false).await? == MergeOutcome::Conflicted {
        log::debug!("pull of {branch} left conflicts");
    }
    ensure_no_conflicts(ctx).await
}

/// Bring `state.branch` up to date with trunk and its remote copy, then push it
pub async fn commit<G, P>(
    ctx: &WorkflowContext<'_, G, P>,
    descriptor: &RemoteDescriptor,
    state: &VersionState,
) -> Result<()>
where
    G: GitExecutor,
    P: Prompter,
{
    let remote = ctx.config.remote.as_str();
    let branch = state.branch.as_str();

    if !ctx.git.stash_list().await?.is_empty() {
        ctx.output.progress("Restoring stashed changes...");
        if ctx.git.stash_pop().await? == MergeOutcome::Conflicted {
            log::debug!("stash pop left conflicts");
        }
    }
    ensure_no_conflicts(ctx).await?;

    commit_pending(ctx).await?;

    checkout_branch(ctx.git, branch).await?;
    ctx.output.verbose(&format!("On branch {branch}"));

    pull_checked(ctx, &ctx.config.trunk).await?;

    let refs = ctx.git.list_remote_refs(remote).await?;
    if advertises_branch(&refs, branch) {
        pull_checked(ctx, branch).await?;
    }

    ctx.git.push(remote, branch).await?;
    ctx.output.success(&format!(
        "Pushed {branch} to {remote} ({} {})",
        descriptor.platform, descriptor.login
    ));
    Ok(())
}
