//! Linking the local repository to the remote and syncing the trunk.

use crate::error::Result;
use crate::git::{GitExecutor, MergeOutcome};
use crate::metadata::ProjectIdentity;
use crate::prompt::Prompter;
use crate::remote::{RemoteDescriptor, RemoteHost};
use crate::workflow::{WorkflowContext, commit_pending, ensure_no_conflicts};

/// Whether an `ls-remote` listing carries `refs/heads/<branch>`
pub fn advertises_branch(refs: &[String], branch: &str) -> bool {
    let wanted = format!("refs/heads/{branch}");
    refs.iter()
        .any(|line| line.split_whitespace().last() == Some(wanted.as_str()))
}

/// Initialize, link `origin`, commit pending work and sync the trunk
pub async fn sync<G, P, H>(
    ctx: &WorkflowContext<'_, G, P>,
    host: &H,
    descriptor: &RemoteDescriptor,
    identity: &ProjectIdentity,
) -> Result<()>
where
    G: GitExecutor,
    P: Prompter,
    H: RemoteHost,
{
    let trunk = ctx.config.trunk.as_str();
    let remote = ctx.config.remote.as_str();

    if !ctx.git.is_repository().await? {
        ctx.git.init(trunk).await?;
        ctx.output.success(&format!("Initialized git repository on {trunk}"));
    }

    let remotes = ctx.git.remotes().await?;
    if !remotes.iter().any(|r| r == remote) {
        let url = host.clone_url(&format!("{}/{}", descriptor.login, identity.repo_name()));
        ctx.git.add_remote(remote, &url).await?;
        ctx.output.success(&format!("Added remote {remote} -> {url}"));
    } else {
        log::debug!("remote {remote} already configured");
    }

    commit_pending(ctx).await?;

    let refs = ctx.git.list_remote_refs(remote).await?;
    if advertises_branch(&refs, trunk) {
        ctx.output.progress(&format!("Pulling {remote}/{trunk}..."));
        if ctx.git.pull(remote, trunk, true).await? == MergeOutcome::Conflicted {
            ensure_no_conflicts(ctx).await?;
        }
    } else {
        ctx.output.progress(&format!("Establishing {trunk} on {remote}..."));
        ctx.git.push(remote, trunk).await?;
    }
    ctx.output.success(&format!("{trunk} is in sync with {remote}"));
    Ok(())
}
