//! The release workflow engine.
//!
//! A run is a strictly sequential chain of stages:
//!
//! ```text
//! Init -> RemoteReady -> LocalSynced -> VersionResolved -> Committed
//!      -> (TagPublished -> TrunkMerged -> BranchesCleaned) -> Done
//! ```
//!
//! Each stage checks the current state before acting, so after a failure the
//! whole pipeline can simply be run again.

mod auto_commit;
mod commit;
mod provision;
mod publish;
mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use auto_commit::{commit_pending, ensure_no_conflicts};
pub use commit::{checkout_branch, commit};
pub use provision::{DEFAULT_GITIGNORE, Provisioned, ensure_ignore_file, ensure_remote_repo, obtain_descriptor, provision};
pub use publish::publish;
pub use sync::{advertises_branch, sync};

use crate::ReleaseConfig;
use crate::cli::OutputManager;
use crate::error::{GitError, ReleaseError, Result};
use crate::git::GitExecutor;
use crate::metadata::PackageDescriptor;
use crate::prompt::Prompter;
use crate::remote::{Platform, RemoteDescriptor, RemoteHost, Repo};
use crate::state::RemoteCache;
use crate::version::{VersionState, resolve};
use std::fmt;

/// Everything a stage needs, borrowed for the duration of a run
pub struct WorkflowContext<'a, G, P> {
    /// Run configuration
    pub config: &'a ReleaseConfig,
    /// Git executor bound to the project directory
    pub git: &'a G,
    /// Source of human decisions
    pub prompter: &'a P,
    /// User-facing output
    pub output: &'a OutputManager,
}

impl<'a, G, P> WorkflowContext<'a, G, P> {
    /// Bundle the collaborators of a run
    pub fn new(
        config: &'a ReleaseConfig,
        git: &'a G,
        prompter: &'a P,
        output: &'a OutputManager,
    ) -> Self {
        Self {
            config,
            git,
            prompter,
            output,
        }
    }
}

/// Pipeline progress markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet
    Init,
    /// Remote repository exists
    RemoteReady,
    /// Local repository linked and trunk synchronized
    LocalSynced,
    /// Version and branch decided
    VersionResolved,
    /// Develop branch committed and pushed
    Committed,
    /// Release tag recreated and pushed
    TagPublished,
    /// Develop branch merged into trunk and pushed
    TrunkMerged,
    /// Develop branch removed locally and remotely
    BranchesCleaned,
    /// Run finished
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::RemoteReady => "remote ready",
            Stage::LocalSynced => "local synced",
            Stage::VersionResolved => "version resolved",
            Stage::Committed => "committed",
            Stage::TagPublished => "tag published",
            Stage::TrunkMerged => "trunk merged",
            Stage::BranchesCleaned => "branches cleaned",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Terminal failure states the user has to resolve by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    /// Unresolved merge conflicts
    ConflictBlocked,
    /// A branch the run needed to pull is missing on the remote
    RemoteRefMissing,
}

impl Blocked {
    /// Which blocked state, if any, an error represents
    pub fn classify(error: &ReleaseError) -> Option<Self> {
        match error {
            ReleaseError::Git(GitError::Conflict { .. }) => Some(Blocked::ConflictBlocked),
            ReleaseError::Git(GitError::RemoteRefMissing { .. }) => Some(Blocked::RemoteRefMissing),
            _ => None,
        }
    }
}

/// Outcome of a completed run
#[derive(Debug)]
pub struct PipelineReport {
    /// Remote selection used
    pub descriptor: RemoteDescriptor,
    /// Remote repository
    pub repo: Repo,
    /// Version and branch worked on
    pub state: VersionState,
    /// Stages reached, in order
    pub stages: Vec<Stage>,
}

fn reach(stages: &mut Vec<Stage>, stage: Stage) {
    log::debug!("stage: {stage}");
    stages.push(stage);
}

/// Run the full pipeline: provision, sync, resolve, commit and optionally publish
pub async fn run<G, P, D, H, F>(
    ctx: &WorkflowContext<'_, G, P>,
    manifest: &D,
    cache: &RemoteCache,
    connect: F,
    publish_release: bool,
) -> Result<PipelineReport>
where
    G: GitExecutor,
    P: Prompter,
    D: PackageDescriptor,
    H: RemoteHost,
    F: Fn(Platform, &str) -> Result<H>,
{
    let mut stages = Vec::new();
    reach(&mut stages, Stage::Init);

    let identity = manifest.read()?;
    ctx.output
        .info(&format!("Project {} {}", identity.name, identity.version));

    ctx.output.section("Remote repository");
    let Provisioned {
        descriptor,
        host,
        repo,
    } = provision(ctx, cache, connect, &identity).await?;
    reach(&mut stages, Stage::RemoteReady);

    ctx.output.section("Local repository");
    sync(ctx, &host, &descriptor, &identity).await?;
    reach(&mut stages, Stage::LocalSynced);

    ctx.output.section("Commit");
    let state = resolve(ctx, manifest, &identity).await?;
    reach(&mut stages, Stage::VersionResolved);

    commit(ctx, &descriptor, &state).await?;
    reach(&mut stages, Stage::Committed);

    if publish_release {
        ctx.output.section("Publish");
        publish(ctx, &descriptor, &state, |stage| reach(&mut stages, stage)).await?;
    }

    reach(&mut stages, Stage::Done);
    Ok(PipelineReport {
        descriptor,
        repo,
        state,
        stages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::remote::Ownership;
    use crate::workflow::testing::{FakeDescriptor, FakeGit, FakeHost, ScriptedPrompter, context};
    use tempfile::TempDir;

    #[test]
    fn test_blocked_classification() {
        let conflict = ReleaseError::from(GitError::Conflict { paths: vec![] });
        let missing = ReleaseError::from(GitError::RemoteRefMissing {
            remote: "origin".to_string(),
            branch: "main".to_string(),
        });
        let other = ReleaseError::from(RemoteError::MissingLogin);
        assert_eq!(Blocked::classify(&conflict), Some(Blocked::ConflictBlocked));
        assert_eq!(Blocked::classify(&missing), Some(Blocked::RemoteRefMissing));
        assert_eq!(Blocked::classify(&other), None);
    }

    fn cached(dir: &TempDir) -> RemoteCache {
        let cache = RemoteCache::at(dir.path().join("remote.json"));
        cache
            .save(&RemoteDescriptor {
                platform: Platform::GitHub,
                login: "octo".to_string(),
                ownership: Ownership::User,
                token: "t".to_string(),
            })
            .expect("seed cache");
        cache
    }

    #[tokio::test]
    async fn test_full_pipeline_with_publish() {
        let dir = TempDir::new().expect("temp dir");
        let cache = cached(&dir);
        let git = FakeGit::new()
            .with_repository()
            .with_remote("origin")
            .with_remote_refs(&["a\trefs/heads/main", "b\trefs/tags/release/1.0.0"]);
        let prompter = ScriptedPrompter::new().choose(1);
        let descriptor = FakeDescriptor::new("app", "1.0.0");
        let (mut config, output) = context();
        config.project_dir = dir.path().to_path_buf();
        let ctx = WorkflowContext::new(&config, &git, &prompter, &output);

        let report = run(&ctx, &descriptor, &cache, |_, _| Ok(FakeHost::new("octo")), true)
            .await
            .expect("pipeline");

        assert_eq!(report.state.branch, "develop/1.1.0");
        assert_eq!(
            report.stages,
            vec![
                Stage::Init,
                Stage::RemoteReady,
                Stage::LocalSynced,
                Stage::VersionResolved,
                Stage::Committed,
                Stage::TagPublished,
                Stage::TrunkMerged,
                Stage::BranchesCleaned,
                Stage::Done,
            ]
        );
        assert!(git.remote_tags().contains(&"release/1.1.0".to_string()));
        assert!(!git.local_branch_names().contains(&"develop/1.1.0".to_string()));
        assert!(dir.path().join(".gitignore").exists());
    }

    #[tokio::test]
    async fn test_rerun_on_clean_repo_deletes_nothing() {
        let dir = TempDir::new().expect("temp dir");
        let cache = cached(&dir);
        std::fs::write(dir.path().join(".gitignore"), "target\n").expect("write");
        let git = FakeGit::new()
            .with_repository()
            .with_remote("origin")
            .with_local_branch("develop/1.0.0")
            .with_remote_refs(&["a\trefs/heads/main", "b\trefs/heads/develop/1.0.0"]);
        let prompter = ScriptedPrompter::new();
        let descriptor = FakeDescriptor::new("app", "1.0.0");
        let (mut config, output) = context();
        config.project_dir = dir.path().to_path_buf();
        let ctx = WorkflowContext::new(&config, &git, &prompter, &output);
        let host = || -> Result<FakeHost> { Ok(FakeHost::new("octo").with_repo("octo/app")) };

        run(&ctx, &descriptor, &cache, |_, _| host(), false).await.expect("first run");
        run(&ctx, &descriptor, &cache, |_, _| host(), false).await.expect("second run");

        let calls = git.calls();
        assert!(!calls.iter().any(|c| c.starts_with("delete") || c.starts_with("commit")));
        assert!(!calls.iter().any(|c| c.starts_with("checkout_new")));
        assert_eq!(prompter.asked(), 0);
    }
}
