//! Tagging a release and folding the develop branch into trunk.

use crate::error::Result;
use crate::git::{GitExecutor, MergeOutcome};
use crate::prompt::Prompter;
use crate::remote::RemoteDescriptor;
use crate::version::{VersionState, release_tag};
use crate::workflow::{Stage, WorkflowContext, advertises_branch, ensure_no_conflicts};

fn advertises_tag(refs: &[String], tag: &str) -> bool {
    let wanted = format!("refs/tags/{tag}");
    refs.iter()
        .any(|line| line.split_whitespace().last() == Some(wanted.as_str()))
}

/// Recreate `release/<version>`, merge the develop branch into trunk and delete it
///
/// `reached` is called as each publish stage completes.
pub async fn publish<G, P, R>(
    ctx: &WorkflowContext<'_, G, P>,
    descriptor: &RemoteDescriptor,
    state: &VersionState,
    mut reached: R,
) -> Result<()>
where
    G: GitExecutor,
    P: Prompter,
    R: FnMut(Stage),
{
    let remote = ctx.config.remote.as_str();
    let trunk = ctx.config.trunk.as_str();
    let branch = state.branch.as_str();
    let tag = release_tag(&state.version);

    let refs = ctx.git.list_remote_refs(remote).await?;
    if advertises_tag(&refs, &tag) {
        ctx.output.progress(&format!("Replacing remote tag {tag}..."));
        ctx.git.delete_remote_tag(remote, &tag).await?;
    }
    if ctx.git.tags().await?.iter().any(|t| *t == tag) {
        ctx.git.delete_tag(&tag).await?;
    }
    ctx.git.create_tag(&tag).await?;
    ctx.git.push_tags(remote).await?;
    ctx.output.success(&format!("Published tag {tag}"));
    reached(Stage::TagPublished);

    ctx.git.checkout(trunk).await?;
    if ctx.git.merge(branch, trunk).await? == MergeOutcome::Conflicted {
        log::debug!("merge of {branch} into {trunk} left conflicts");
    }
    ensure_no_conflicts(ctx).await?;
    ctx.git.push(remote, trunk).await?;
    ctx.output.success(&format!("Merged {branch} into {trunk}"));
    reached(Stage::TrunkMerged);

    if ctx.git.local_branches().await?.iter().any(|b| b == branch) {
        ctx.git.delete_branch(branch).await?;
    }
    let refs = ctx.git.list_remote_refs(remote).await?;
    if advertises_branch(&refs, branch) {
        ctx.git.delete_remote_branch(remote, branch).await?;
    }
    ctx.output.success(&format!(
        "Released {} to {} {}",
        state.version, descriptor.platform, descriptor.login
    ));
    reached(Stage::BranchesCleaned);
    Ok(())
}
