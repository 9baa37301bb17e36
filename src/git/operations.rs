//! Git executor trait and result types for the release workflow.
//!
//! The workflow only reasons about the *results* of git verbs; the
//! [`GitExecutor`] trait is the seam between that logic and the process that
//! actually runs git. The production implementation lives in the `system`
//! module and shells out to the git binary.

use crate::error::Result;
use std::future::Future;

/// Trait defining all git verbs the release workflow issues
pub trait GitExecutor {
    /// Whether the working directory already holds a repository
    fn is_repository(&self) -> impl Future<Output = Result<bool>>;

    /// Initialize a repository whose first branch is `initial_branch`
    fn init(&self, initial_branch: &str) -> impl Future<Output = Result<()>>;

    /// Snapshot the working tree
    fn status(&self) -> impl Future<Output = Result<WorkingTreeStatus>>;

    /// Stage paths (additions, modifications and deletions alike)
    fn add(&self, paths: &[String]) -> impl Future<Output = Result<()>>;

    /// Commit the index
    fn commit(&self, message: &str) -> impl Future<Output = Result<()>>;

    /// Names of configured remotes
    fn remotes(&self) -> impl Future<Output = Result<Vec<String>>>;

    /// Add a remote
    fn add_remote(&self, name: &str, url: &str) -> impl Future<Output = Result<()>>;

    /// Raw `<sha>\t<ref>` lines advertised by a remote
    fn list_remote_refs(&self, remote: &str) -> impl Future<Output = Result<Vec<String>>>;

    /// Pull `branch` from `remote` into the current branch
    ///
    /// A ref missing on the remote is reported as
    /// [`GitError::RemoteRefMissing`](crate::error::GitError::RemoteRefMissing);
    /// merge conflicts are reported through [`MergeOutcome::Conflicted`].
    fn pull(
        &self,
        remote: &str,
        branch: &str,
        allow_unrelated_histories: bool,
    ) -> impl Future<Output = Result<MergeOutcome>>;

    /// Push a branch to a remote under the same name
    fn push(&self, remote: &str, branch: &str) -> impl Future<Output = Result<()>>;

    /// Push all local tags
    fn push_tags(&self, remote: &str) -> impl Future<Output = Result<()>>;

    /// Delete a tag on the remote
    fn delete_remote_tag(&self, remote: &str, tag: &str) -> impl Future<Output = Result<()>>;

    /// Local tag names
    fn tags(&self) -> impl Future<Output = Result<Vec<String>>>;

    /// Create a lightweight tag at HEAD
    fn create_tag(&self, name: &str) -> impl Future<Output = Result<()>>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> impl Future<Output = Result<()>>;

    /// Local branch names
    fn local_branches(&self) -> impl Future<Output = Result<Vec<String>>>;

    /// Switch to an existing branch
    fn checkout(&self, branch: &str) -> impl Future<Output = Result<()>>;

    /// Create a branch from HEAD and switch to it
    fn checkout_new(&self, branch: &str) -> impl Future<Output = Result<()>>;

    /// Merge `from` into `into`, leaving `into` checked out
    fn merge(&self, from: &str, into: &str) -> impl Future<Output = Result<MergeOutcome>>;

    /// Stash entries, newest first
    fn stash_list(&self) -> impl Future<Output = Result<Vec<String>>>;

    /// Pop the newest stash entry; a conflicting pop keeps the entry and leaves conflicts
    fn stash_pop(&self) -> impl Future<Output = Result<MergeOutcome>>;

    /// Delete a fully merged local branch
    fn delete_branch(&self, branch: &str) -> impl Future<Output = Result<()>>;

    /// Delete a branch on the remote
    fn delete_remote_branch(&self, remote: &str, branch: &str) -> impl Future<Output = Result<()>>;
}

/// Result of a pull or merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Merge completed (including fast-forward and already up to date)
    Clean,
    /// Merge stopped with conflicts left in the working tree
    Conflicted,
}

/// A path renamed in the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedPath {
    /// Original path
    pub from: String,
    /// Destination path
    pub to: String,
}

/// Point-in-time view of the working tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    /// Untracked paths
    pub not_added: Vec<String>,
    /// Paths newly added to the index
    pub created: Vec<String>,
    /// Deleted paths
    pub deleted: Vec<String>,
    /// Modified paths
    pub modified: Vec<String>,
    /// Renamed paths
    pub renamed: Vec<RenamedPath>,
    /// Paths with unresolved conflicts
    pub conflicted: Vec<String>,
}

impl WorkingTreeStatus {
    /// Whether any of the five committable sets is non-empty
    pub fn has_pending_changes(&self) -> bool {
        !(self.not_added.is_empty()
            && self.created.is_empty()
            && self.deleted.is_empty()
            && self.modified.is_empty()
            && self.renamed.is_empty())
    }

    /// Whether any path is in conflict
    pub fn has_conflicts(&self) -> bool {
        !self.conflicted.is_empty()
    }

    /// Every non-empty committable set, renames by destination path
    pub fn staging_groups(&self) -> Vec<Vec<String>> {
        let renamed: Vec<String> = self.renamed.iter().map(|r| r.to.clone()).collect();
        [
            self.not_added.clone(),
            self.created.clone(),
            self.deleted.clone(),
            self.modified.clone(),
            renamed,
        ]
        .into_iter()
        .filter(|group| !group.is_empty())
        .collect()
    }
}
