//! [`GitExecutor`] backed by the system git binary.

use crate::error::{GitError, Result};
use crate::git::status::parse_porcelain;
use crate::git::{GitExecutor, MergeOutcome, WorkingTreeStatus};
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

/// Runs git verbs in a fixed working directory
#[derive(Debug, Clone)]
pub struct SystemGit {
    git: PathBuf,
    work_dir: PathBuf,
}

impl SystemGit {
    /// Locate git on `PATH` and bind to `work_dir`
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Result<Self> {
        let git = which::which("git").map_err(|_| GitError::GitNotInstalled)?;
        Ok(Self {
            git,
            work_dir: work_dir.as_ref().to_path_buf(),
        })
    }

    /// Working directory commands run in
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Outcome detection reads git's messages, so they must stay untranslated
    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.git);
        command
            .args(args)
            .current_dir(&self.work_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("LC_ALL", "C")
            .env("LANGUAGE", "C")
            .kill_on_drop(true);
        command
    }

    async fn output(&self, args: &[&str]) -> Result<Output> {
        log::debug!("git {}", args.join(" "));
        let output = self
            .command(args)
            .output()
            .await
            .map_err(|e| GitError::CommandFailed {
                command: args.join(" "),
                reason: e.to_string(),
            })?;
        Ok(output)
    }

    /// Run a command that must succeed, returning stdout
    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(failure(args, &output).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn lines(&self, args: &[&str]) -> Result<Vec<String>> {
        Ok(self
            .run(args)
            .await?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Interpret the result of a pull or merge
    fn merge_outcome(args: &[&str], output: &Output) -> std::result::Result<MergeOutcome, GitError> {
        if output.status.success() {
            return Ok(MergeOutcome::Clean);
        }
        let combined = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        if combined.contains("CONFLICT") || combined.contains("Automatic merge failed") {
            log::debug!("git {} stopped with conflicts", args.join(" "));
            return Ok(MergeOutcome::Conflicted);
        }
        Err(failure(args, output))
    }
}

fn failure(args: &[&str], output: &Output) -> GitError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    GitError::CommandFailed {
        command: args.join(" "),
        reason: if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr
        },
    }
}

impl GitExecutor for SystemGit {
    async fn is_repository(&self) -> Result<bool> {
        Ok(self.work_dir.join(".git").exists())
    }

    async fn init(&self, initial_branch: &str) -> Result<()> {
        let flag = format!("--initial-branch={initial_branch}");
        self.run(&["init", &flag]).await?;
        Ok(())
    }

    async fn status(&self) -> Result<WorkingTreeStatus> {
        let out = self.run(&["status", "--porcelain=v1", "-z"]).await?;
        parse_porcelain(&out)
    }

    async fn add(&self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "-A", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run(&args).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).await?;
        Ok(())
    }

    async fn remotes(&self) -> Result<Vec<String>> {
        self.lines(&["remote"]).await
    }

    async fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url]).await?;
        Ok(())
    }

    async fn list_remote_refs(&self, remote: &str) -> Result<Vec<String>> {
        self.lines(&["ls-remote", "--refs", remote]).await
    }

    async fn pull(
        &self,
        remote: &str,
        branch: &str,
        allow_unrelated_histories: bool,
    ) -> Result<MergeOutcome> {
        let mut args = vec!["pull", "--no-rebase", "--no-edit"];
        if allow_unrelated_histories {
            args.push("--allow-unrelated-histories");
        }
        args.extend([remote, branch]);

        let output = self.output(&args).await?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() && stderr.contains("couldn't find remote ref") {
            return Err(GitError::RemoteRefMissing {
                remote: remote.to_string(),
                branch: branch.to_string(),
            }
            .into());
        }
        Ok(Self::merge_outcome(&args, &output)?)
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).await?;
        Ok(())
    }

    async fn push_tags(&self, remote: &str) -> Result<()> {
        self.run(&["push", remote, "--tags"]).await?;
        Ok(())
    }

    async fn delete_remote_tag(&self, remote: &str, tag: &str) -> Result<()> {
        let refspec = format!(":refs/tags/{tag}");
        self.run(&["push", remote, &refspec]).await?;
        Ok(())
    }

    async fn tags(&self) -> Result<Vec<String>> {
        self.lines(&["tag", "--list"]).await
    }

    async fn create_tag(&self, name: &str) -> Result<()> {
        self.run(&["tag", name]).await?;
        Ok(())
    }

    async fn delete_tag(&self, name: &str) -> Result<()> {
        self.run(&["tag", "-d", name]).await?;
        Ok(())
    }

    async fn local_branches(&self) -> Result<Vec<String>> {
        self.lines(&["branch", "--list", "--format=%(refname:short)"])
            .await
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).await?;
        Ok(())
    }

    async fn checkout_new(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch]).await?;
        Ok(())
    }

    async fn merge(&self, from: &str, into: &str) -> Result<MergeOutcome> {
        self.checkout(into).await?;
        let args = ["merge", "--no-edit", from];
        let output = self.output(&args).await?;
        Ok(Self::merge_outcome(&args, &output)?)
    }

    async fn stash_list(&self) -> Result<Vec<String>> {
        self.lines(&["stash", "list"]).await
    }

    async fn stash_pop(&self) -> Result<MergeOutcome> {
        let args = ["stash", "pop"];
        let output = self.output(&args).await?;
        Ok(Self::merge_outcome(&args, &output)?)
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        self.run(&["branch", "-d", branch]).await?;
        Ok(())
    }

    async fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, "--delete", branch]).await?;
        Ok(())
    }
}
