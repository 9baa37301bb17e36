//! Committing whatever the working tree holds.

use crate::error::{GitError, Result};
use crate::git::GitExecutor;
use crate::prompt::{Prompter, non_blank};
use crate::workflow::WorkflowContext;

/// Fail with [`GitError::Conflict`] when the tree has unresolved paths
pub async fn ensure_no_conflicts<G, P>(ctx: &WorkflowContext<'_, G, P>) -> Result<()>
where
    G: GitExecutor,
{
    let status = ctx.git.status().await?;
    if status.has_conflicts() {
        for path in &status.conflicted {
            ctx.output.indent(path);
        }
        return Err(GitError::Conflict {
            paths: status.conflicted,
        }
        .into());
    }
    Ok(())
}

/// Stage and commit pending changes, asking for a message
///
/// Returns `false` when there was nothing to commit. Never touches the remote.
pub async fn commit_pending<G, P>(ctx: &WorkflowContext<'_, G, P>) -> Result<bool>
where
    G: GitExecutor,
    P: Prompter,
{
    let status = ctx.git.status().await?;
    if !status.has_pending_changes() {
        log::debug!("working tree clean, nothing to commit");
        return Ok(false);
    }

    for group in status.staging_groups() {
        ctx.git.add(&group).await?;
    }

    let message = loop {
        let answer = ctx.prompter.input("Commit message", &non_blank)?;
        let trimmed = answer.trim();
        if !trimmed.is_empty() {
            break trimmed.to_string();
        }
        ctx.output.warn("Commit message cannot be empty");
    };

    ctx.git.commit(&message).await?;
    ctx.output.success(&format!("Committed: {message}"));
    Ok(true)
}
