//! Remote repository provisioning.

use crate::error::{RemoteError, Result};
use crate::metadata::ProjectIdentity;
use crate::prompt::{Prompter, select_value};
use crate::remote::{Ownership, Platform, RemoteDescriptor, RemoteHost, Repo};
use crate::state::RemoteCache;
use crate::workflow::WorkflowContext;
use std::fs;
use std::path::Path;

/// Written to `.gitignore` when the project has none
pub const DEFAULT_GITIGNORE: &str = "\
.DS_Store
node_modules
/dist
/target

# local env files
.env.local
.env.*.local

# Log files
npm-debug.log*
yarn-debug.log*
yarn-error.log*
pnpm-debug.log*

# Editor directories and files
.idea
.vscode
*.suo
*.ntvs*
*.njsproj
*.sln
*.sw?
";

/// Result of provisioning: who we are on which host, and the repository
#[derive(Debug)]
pub struct Provisioned<H> {
    /// Remote selection, possibly freshly cached
    pub descriptor: RemoteDescriptor,
    /// Client authenticated with the descriptor's token
    pub host: H,
    /// Remote repository for the project
    pub repo: Repo,
}

/// Ensure the remote repository and the local ignore file exist
pub async fn provision<G, P, H, F>(
    ctx: &WorkflowContext<'_, G, P>,
    cache: &RemoteCache,
    connect: F,
    identity: &ProjectIdentity,
) -> Result<Provisioned<H>>
where
    P: Prompter,
    H: RemoteHost,
    F: Fn(Platform, &str) -> Result<H>,
{
    let (descriptor, host) = obtain_descriptor(ctx, cache, connect).await?;
    let repo = ensure_remote_repo(ctx, &host, &descriptor, identity).await?;
    if ensure_ignore_file(&ctx.config.project_dir)? {
        ctx.output.success("Created .gitignore");
    }
    Ok(Provisioned {
        descriptor,
        host,
        repo,
    })
}

/// Load the cached remote selection or walk the user through making one
pub async fn obtain_descriptor<G, P, H, F>(
    ctx: &WorkflowContext<'_, G, P>,
    cache: &RemoteCache,
    connect: F,
) -> Result<(RemoteDescriptor, H)>
where
    P: Prompter,
    H: RemoteHost,
    F: Fn(Platform, &str) -> Result<H>,
{
    if let Some(descriptor) = cache.load()? {
        ctx.output.verbose(&format!(
            "Using cached {} account {}",
            descriptor.platform, descriptor.login
        ));
        let host = connect(descriptor.platform, &descriptor.token)?;
        return Ok((descriptor, host));
    }

    let platforms: Vec<(String, Platform)> = Platform::ALL
        .iter()
        .map(|p| (p.display_name().to_string(), *p))
        .collect();
    let platform = select_value(ctx.prompter, "Select the git hosting platform", &platforms, 0)?;

    let token = match ctx.config.env_token(platform) {
        Some(token) => {
            ctx.output.verbose(&format!("Using {platform} token from the environment"));
            token.to_string()
        }
        None => loop {
            let token = ctx.prompter.password(&format!("{platform} access token"))?;
            if !token.trim().is_empty() {
                break token.trim().to_string();
            }
            ctx.output.warn("Access token cannot be empty");
        },
    };

    let host = connect(platform, &token)?;
    let user = host.current_user().await?;

    let kinds: Vec<(String, Ownership)> = Ownership::ALL
        .iter()
        .map(|o| (o.display_name().to_string(), *o))
        .collect();
    let ownership = select_value(ctx.prompter, "Create repositories under", &kinds, 0)?;

    let login = match ownership {
        Ownership::User => user.login,
        Ownership::Organization => {
            let organizations: Vec<(String, String)> = host
                .organizations()
                .await?
                .into_iter()
                .map(|org| (org.login.clone(), org.login))
                .collect();
            if organizations.is_empty() {
                return Err(RemoteError::MissingLogin.into());
            }
            select_value(ctx.prompter, "Select the organization", &organizations, 0)?
        }
    };
    if login.trim().is_empty() {
        return Err(RemoteError::MissingLogin.into());
    }

    let descriptor = RemoteDescriptor {
        platform,
        login,
        ownership,
        token,
    };
    cache.save(&descriptor)?;
    ctx.output.success(&format!(
        "Saved {} account {} to {}",
        descriptor.platform,
        descriptor.login,
        cache.path().display()
    ));
    Ok((descriptor, host))
}

/// Look up `login/name` and create it when absent
pub async fn ensure_remote_repo<G, P, H>(
    ctx: &WorkflowContext<'_, G, P>,
    host: &H,
    descriptor: &RemoteDescriptor,
    identity: &ProjectIdentity,
) -> Result<Repo>
where
    H: RemoteHost,
{
    let name = identity.repo_name();
    ctx.output
        .progress(&format!("Checking {}/{} on {}...", descriptor.login, name, host.platform()));

    if let Some(repo) = host.find_repo(&descriptor.login, name).await? {
        ctx.output.info(&format!("Remote repository {} exists", repo.full_name));
        return Ok(repo);
    }

    let repo = host
        .create_repo(&descriptor.login, descriptor.ownership, name)
        .await?;
    ctx.output
        .success(&format!("Created remote repository {}", repo.full_name));
    Ok(repo)
}

/// Write [`DEFAULT_GITIGNORE`] unless `.gitignore` already exists
pub fn ensure_ignore_file(project_dir: &Path) -> Result<bool> {
    let path = project_dir.join(".gitignore");
    if path.exists() {
        return Ok(false);
    }
    fs::write(&path, DEFAULT_GITIGNORE)?;
    Ok(true)
}
