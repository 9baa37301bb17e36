//! The `commit` command.

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::git::SystemGit;
use crate::metadata::Manifest;
use crate::prompt::TerminalPrompter;
use crate::remote::HostClient;
use crate::state::RemoteCache;
use crate::workflow::{self, WorkflowContext};

/// Run the workflow against the project in the current directory
pub(super) async fn execute_commit(config: &RuntimeConfig, clear: bool, publish: bool) -> Result<i32> {
    let output = config.output();
    let release = config.release();

    let cache = RemoteCache::default_location()?;
    if clear {
        if cache.clear()? {
            output.success(&format!("Removed {}", cache.path().display()));
        } else {
            output.info("No cached remote account to clear");
        }
    }

    let manifest = Manifest::detect(&release.project_dir)?;
    let git = SystemGit::new(&release.project_dir)?;
    let prompter = TerminalPrompter::new();
    let ctx = WorkflowContext::new(release, &git, &prompter, output);

    let report = workflow::run(&ctx, &manifest, &cache, HostClient::new, publish).await?;

    output.section("Done");
    output.success(&format!("{} on {}", report.state.branch, report.repo.full_name));
    if !report.repo.html_url.is_empty() {
        output.indent(&report.repo.html_url);
    }
    if publish {
        output.indent(&format!("release/{}", report.state.version));
    }
    Ok(0)
}
