//! In-memory collaborators for driving the workflow in tests.

use crate::ReleaseConfig;
use crate::cli::OutputManager;
use crate::error::{GitError, PromptError, Result};
use crate::git::{GitExecutor, MergeOutcome, WorkingTreeStatus};
use crate::metadata::{PackageDescriptor, ProjectIdentity};
use crate::prompt::{Prompter, Validator};
use crate::remote::{Account, Ownership, Platform, RemoteHost, Repo};
use semver::Version;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

/// Default configuration and a silent output manager
pub(crate) fn context() -> (ReleaseConfig, OutputManager) {
    (ReleaseConfig::default(), OutputManager::new(false, true))
}

#[derive(Default)]
struct GitState {
    repository: bool,
    current: String,
    branches: Vec<String>,
    head: u32,
    statuses: VecDeque<WorkingTreeStatus>,
    remotes: Vec<String>,
    remote_heads: Vec<String>,
    remote_tags: BTreeMap<String, u32>,
    other_refs: Vec<String>,
    tags: BTreeMap<String, u32>,
    stash: Vec<String>,
    conflicting: Vec<String>,
    conflicting_stash: bool,
}

/// Simulated repository plus remote; records every mutating verb
#[derive(Default)]
pub(crate) struct FakeGit {
    state: RefCell<GitState>,
    calls: RefCell<Vec<String>>,
}

fn failed(command: &str, reason: &str) -> crate::error::ReleaseError {
    GitError::CommandFailed {
        command: command.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

impl FakeGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// An initialized repository sitting on `main`
    pub(crate) fn with_repository(self) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.repository = true;
            state.current = "main".to_string();
            state.branches.push("main".to_string());
        }
        self
    }

    pub(crate) fn with_remote(self, name: &str) -> Self {
        self.state.borrow_mut().remotes.push(name.to_string());
        self
    }

    /// Seed the remote from `ls-remote` style lines
    pub(crate) fn with_remote_refs(self, lines: &[&str]) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for line in lines {
                let name = line.split_whitespace().last().unwrap_or_default();
                if let Some(branch) = name.strip_prefix("refs/heads/") {
                    state.remote_heads.push(branch.to_string());
                } else if let Some(tag) = name.strip_prefix("refs/tags/") {
                    state.remote_tags.insert(tag.to_string(), 0);
                } else {
                    state.other_refs.push(line.to_string());
                }
            }
        }
        self
    }

    pub(crate) fn with_local_branch(self, branch: &str) -> Self {
        self.state.borrow_mut().branches.push(branch.to_string());
        self
    }

    pub(crate) fn with_local_tag(self, tag: &str) -> Self {
        self.state.borrow_mut().tags.insert(tag.to_string(), 0);
        self
    }

    /// Queue a status snapshot; once drained the tree reports clean
    pub(crate) fn with_status(self, status: WorkingTreeStatus) -> Self {
        self.state.borrow_mut().statuses.push_back(status);
        self
    }

    pub(crate) fn with_stash(self, entry: &str) -> Self {
        self.state.borrow_mut().stash.push(entry.to_string());
        self
    }

    /// A stash entry whose pop conflicts with the working tree
    pub(crate) fn with_conflicting_stash(self, entry: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.stash.push(entry.to_string());
            state.conflicting_stash = true;
        }
        self
    }

    /// Pulling or merging `branch` stops with a conflict
    pub(crate) fn with_conflict_on(self, branch: &str) -> Self {
        self.state.borrow_mut().conflicting.push(branch.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn current_branch(&self) -> String {
        self.state.borrow().current.clone()
    }

    pub(crate) fn local_branch_names(&self) -> Vec<String> {
        self.state.borrow().branches.clone()
    }

    pub(crate) fn remote_branches(&self) -> Vec<String> {
        self.state.borrow().remote_heads.clone()
    }

    pub(crate) fn local_tags(&self) -> Vec<String> {
        self.state.borrow().tags.keys().cloned().collect()
    }

    pub(crate) fn remote_tags(&self) -> Vec<String> {
        self.state.borrow().remote_tags.keys().cloned().collect()
    }

    /// Commit a remote tag points at
    pub(crate) fn remote_tag_target(&self, tag: &str) -> Option<u32> {
        self.state.borrow().remote_tags.get(tag).copied()
    }

    pub(crate) fn head(&self) -> u32 {
        self.state.borrow().head
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn switch_to(&self, branch: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.branches.iter().any(|b| b == branch) {
            return Err(failed("checkout", &format!("pathspec '{branch}' did not match")));
        }
        state.current = branch.to_string();
        Ok(())
    }

    fn integrate(&self, branch: &str) -> MergeOutcome {
        let mut state = self.state.borrow_mut();
        if state.conflicting.iter().any(|b| b == branch) {
            state.statuses.push_front(WorkingTreeStatus {
                conflicted: vec!["src/lib.rs".to_string()],
                ..WorkingTreeStatus::default()
            });
            MergeOutcome::Conflicted
        } else {
            state.head += 1;
            MergeOutcome::Clean
        }
    }
}

impl GitExecutor for FakeGit {
    async fn is_repository(&self) -> Result<bool> {
        Ok(self.state.borrow().repository)
    }

    async fn init(&self, initial_branch: &str) -> Result<()> {
        self.record(format!("init {initial_branch}"));
        let mut state = self.state.borrow_mut();
        state.repository = true;
        state.current = initial_branch.to_string();
        state.branches = vec![initial_branch.to_string()];
        Ok(())
    }

    async fn status(&self) -> Result<WorkingTreeStatus> {
        Ok(self.state.borrow_mut().statuses.pop_front().unwrap_or_default())
    }

    async fn add(&self, paths: &[String]) -> Result<()> {
        self.record(format!("add {}", paths.join(" ")));
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.record(format!("commit {message}"));
        self.state.borrow_mut().head += 1;
        Ok(())
    }

    async fn remotes(&self) -> Result<Vec<String>> {
        Ok(self.state.borrow().remotes.clone())
    }

    async fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.record(format!("add_remote {name} {url}"));
        self.state.borrow_mut().remotes.push(name.to_string());
        Ok(())
    }

    async fn list_remote_refs(&self, _remote: &str) -> Result<Vec<String>> {
        let state = self.state.borrow();
        let heads = state
            .remote_heads
            .iter()
            .map(|b| format!("0000000\trefs/heads/{b}"));
        let tags = state
            .remote_tags
            .iter()
            .map(|(t, id)| format!("{id:07}\trefs/tags/{t}"));
        Ok(heads.chain(tags).chain(state.other_refs.iter().cloned()).collect())
    }

    async fn pull(
        &self,
        remote: &str,
        branch: &str,
        allow_unrelated_histories: bool,
    ) -> Result<MergeOutcome> {
        let flag = if allow_unrelated_histories {
            " --allow-unrelated-histories"
        } else {
            ""
        };
        self.record(format!("pull {remote} {branch}{flag}"));
        if !self.state.borrow().remote_heads.iter().any(|b| b == branch) {
            return Err(GitError::RemoteRefMissing {
                remote: remote.to_string(),
                branch: branch.to_string(),
            }
            .into());
        }
        Ok(self.integrate(branch))
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("push {remote} {branch}"));
        let mut state = self.state.borrow_mut();
        if !state.remote_heads.iter().any(|b| b == branch) {
            state.remote_heads.push(branch.to_string());
        }
        Ok(())
    }

    async fn push_tags(&self, remote: &str) -> Result<()> {
        self.record(format!("push_tags {remote}"));
        let mut state = self.state.borrow_mut();
        let tags = state.tags.clone();
        state.remote_tags.extend(tags);
        Ok(())
    }

    async fn delete_remote_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.record(format!("delete_remote_tag {remote} {tag}"));
        match self.state.borrow_mut().remote_tags.remove(tag) {
            Some(_) => Ok(()),
            None => Err(failed("push", &format!("unable to delete '{tag}': remote ref does not exist"))),
        }
    }

    async fn tags(&self) -> Result<Vec<String>> {
        Ok(self.local_tags())
    }

    async fn create_tag(&self, name: &str) -> Result<()> {
        self.record(format!("create_tag {name}"));
        let mut state = self.state.borrow_mut();
        if state.tags.contains_key(name) {
            return Err(failed("tag", &format!("tag '{name}' already exists")));
        }
        let head = state.head;
        state.tags.insert(name.to_string(), head);
        Ok(())
    }

    async fn delete_tag(&self, name: &str) -> Result<()> {
        self.record(format!("delete_tag {name}"));
        match self.state.borrow_mut().tags.remove(name) {
            Some(_) => Ok(()),
            None => Err(failed("tag", &format!("tag '{name}' not found"))),
        }
    }

    async fn local_branches(&self) -> Result<Vec<String>> {
        Ok(self.local_branch_names())
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout {branch}"));
        self.switch_to(branch)
    }

    async fn checkout_new(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout_new {branch}"));
        let mut state = self.state.borrow_mut();
        if state.branches.iter().any(|b| b == branch) {
            return Err(failed("checkout", &format!("a branch named '{branch}' already exists")));
        }
        state.branches.push(branch.to_string());
        state.current = branch.to_string();
        Ok(())
    }

    async fn merge(&self, from: &str, into: &str) -> Result<MergeOutcome> {
        self.record(format!("merge {from} {into}"));
        self.switch_to(into)?;
        Ok(self.integrate(from))
    }

    async fn stash_list(&self) -> Result<Vec<String>> {
        Ok(self.state.borrow().stash.clone())
    }

    async fn stash_pop(&self) -> Result<MergeOutcome> {
        self.record("stash_pop".to_string());
        let mut state = self.state.borrow_mut();
        if state.stash.is_empty() {
            return Err(failed("stash pop", "No stash entries found."));
        }
        if state.conflicting_stash {
            state.statuses.push_front(WorkingTreeStatus {
                conflicted: vec!["a.txt".to_string()],
                ..WorkingTreeStatus::default()
            });
            return Ok(MergeOutcome::Conflicted);
        }
        state.stash.pop();
        Ok(MergeOutcome::Clean)
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        self.record(format!("delete_branch {branch}"));
        let mut state = self.state.borrow_mut();
        if state.current == branch {
            return Err(failed("branch", &format!("cannot delete branch '{branch}' checked out")));
        }
        state.branches.retain(|b| b != branch);
        Ok(())
    }

    async fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("delete_remote_branch {remote} {branch}"));
        let mut state = self.state.borrow_mut();
        if !state.remote_heads.iter().any(|b| b == branch) {
            return Err(failed("push", &format!("unable to delete '{branch}': remote ref does not exist")));
        }
        state.remote_heads.retain(|b| b != branch);
        Ok(())
    }
}

/// Answers prompts from a script; runs out with an error
#[derive(Default)]
pub(crate) struct ScriptedPrompter {
    choices: RefCell<VecDeque<usize>>,
    answers: RefCell<VecDeque<String>>,
    secrets: RefCell<VecDeque<String>>,
    asked: Cell<usize>,
}

impl ScriptedPrompter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn choose(self, index: usize) -> Self {
        self.choices.borrow_mut().push_back(index);
        self
    }

    pub(crate) fn answer(self, text: &str) -> Self {
        self.answers.borrow_mut().push_back(text.to_string());
        self
    }

    pub(crate) fn secret(self, text: &str) -> Self {
        self.secrets.borrow_mut().push_back(text.to_string());
        self
    }

    /// Number of questions shown, re-asks included
    pub(crate) fn asked(&self) -> usize {
        self.asked.get()
    }

    fn next<T>(&self, prompt: &str, queue: &RefCell<VecDeque<T>>) -> Result<T> {
        self.asked.set(self.asked.get() + 1);
        queue.borrow_mut().pop_front().ok_or_else(|| {
            PromptError::Interaction {
                prompt: prompt.to_string(),
                reason: "no scripted answer".to_string(),
            }
            .into()
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, prompt: &str, _items: &[String], _default: usize) -> Result<usize> {
        self.next(prompt, &self.choices)
    }

    fn input(&self, prompt: &str, validate: Validator<'_>) -> Result<String> {
        loop {
            let answer = self.next(prompt, &self.answers)?;
            if validate(&answer).is_ok() {
                return Ok(answer);
            }
        }
    }

    fn password(&self, prompt: &str) -> Result<String> {
        self.next(prompt, &self.secrets)
    }
}

/// Package descriptor held in memory
pub(crate) struct FakeDescriptor {
    path: PathBuf,
    name: String,
    version: RefCell<Version>,
    written: RefCell<Vec<Version>>,
}

impl FakeDescriptor {
    pub(crate) fn new(name: &str, version: &str) -> Self {
        Self {
            path: PathBuf::from("package.json"),
            name: name.to_string(),
            version: RefCell::new(Version::parse(version).expect("valid test version")),
            written: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn identity(&self) -> ProjectIdentity {
        ProjectIdentity {
            name: self.name.clone(),
            version: self.version.borrow().clone(),
        }
    }

    /// Versions written so far, oldest first
    pub(crate) fn written(&self) -> Vec<Version> {
        self.written.borrow().clone()
    }
}

impl PackageDescriptor for FakeDescriptor {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<ProjectIdentity> {
        Ok(self.identity())
    }

    fn write_version(&self, version: &Version) -> Result<()> {
        *self.version.borrow_mut() = version.clone();
        self.written.borrow_mut().push(version.clone());
        Ok(())
    }
}

/// Hosting platform held in memory
#[derive(Debug)]
pub(crate) struct FakeHost {
    login: String,
    organizations: Vec<String>,
    repos: RefCell<Vec<String>>,
    created: RefCell<Vec<String>>,
}

impl FakeHost {
    pub(crate) fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
            organizations: Vec::new(),
            repos: RefCell::new(Vec::new()),
            created: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn with_repo(self, full_name: &str) -> Self {
        self.repos.borrow_mut().push(full_name.to_string());
        self
    }

    pub(crate) fn with_organizations(mut self, logins: &[&str]) -> Self {
        self.organizations = logins.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Repositories created through this client
    pub(crate) fn created(&self) -> Vec<String> {
        self.created.borrow().clone()
    }

    fn repo(full_name: &str) -> Repo {
        Repo {
            full_name: full_name.to_string(),
            html_url: format!("https://github.com/{full_name}"),
        }
    }
}

impl RemoteHost for FakeHost {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    async fn current_user(&self) -> Result<Account> {
        Ok(Account {
            login: self.login.clone(),
        })
    }

    async fn organizations(&self) -> Result<Vec<Account>> {
        Ok(self
            .organizations
            .iter()
            .map(|login| Account {
                login: login.clone(),
            })
            .collect())
    }

    async fn find_repo(&self, owner: &str, name: &str) -> Result<Option<Repo>> {
        let full_name = format!("{owner}/{name}");
        Ok(self
            .repos
            .borrow()
            .iter()
            .find(|r| **r == full_name)
            .map(|r| Self::repo(r)))
    }

    async fn create_repo(&self, owner: &str, _ownership: Ownership, name: &str) -> Result<Repo> {
        let full_name = format!("{owner}/{name}");
        self.repos.borrow_mut().push(full_name.clone());
        self.created.borrow_mut().push(full_name.clone());
        Ok(Self::repo(&full_name))
    }

    fn clone_url(&self, full_name: &str) -> String {
        format!("https://github.com/{full_name}.git")
    }
}
