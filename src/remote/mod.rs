//! Remote source-control hosts.
//!
//! Each hosting platform implements [`RemoteHost`]; [`HostClient`] selects the
//! implementation named by a [`RemoteDescriptor`].

mod gitee;
mod github;
mod http;

pub use gitee::GiteeHost;
pub use github::GitHubHost;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Supported hosting platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// github.com
    GitHub,
    /// gitee.com
    Gitee,
}

impl Platform {
    /// Offered in prompt order
    pub const ALL: [Platform; 2] = [Platform::GitHub, Platform::Gitee];

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::GitHub => "GitHub",
            Platform::Gitee => "Gitee",
        }
    }

    /// Environment variables consulted for an access token, in order
    pub fn token_env_vars(self) -> &'static [&'static str] {
        match self {
            Platform::GitHub => &["GITHUB_TOKEN", "GH_TOKEN"],
            Platform::Gitee => &["GITEE_TOKEN"],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether repositories live under a personal or an organization account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    /// Personal account
    User,
    /// Organization / group account
    Organization,
}

impl Ownership {
    /// Offered in prompt order
    pub const ALL: [Ownership; 2] = [Ownership::User, Ownership::Organization];

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Ownership::User => "User",
            Ownership::Organization => "Organization",
        }
    }
}

/// Which host, which account, and how to authenticate
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDescriptor {
    /// Hosting platform
    pub platform: Platform,
    /// Account repositories are created under
    pub login: String,
    /// Kind of account `login` names
    pub ownership: Ownership,
    /// API access token
    pub token: String,
}

impl fmt::Debug for RemoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteDescriptor")
            .field("platform", &self.platform)
            .field("login", &self.login)
            .field("ownership", &self.ownership)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// An account as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Login name
    pub login: String,
}

/// A repository as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repo {
    /// `owner/name`
    pub full_name: String,
    /// Web URL
    #[serde(default)]
    pub html_url: String,
}

/// Capability interface over one hosting platform's REST API
pub trait RemoteHost {
    /// Platform this client talks to
    fn platform(&self) -> Platform;

    /// Account owning the token
    fn current_user(&self) -> impl Future<Output = Result<Account>>;

    /// Organizations the token's account belongs to
    fn organizations(&self) -> impl Future<Output = Result<Vec<Account>>>;

    /// Look up `owner/name`, `None` when it does not exist
    fn find_repo(&self, owner: &str, name: &str) -> impl Future<Output = Result<Option<Repo>>>;

    /// Create `name` under the user's account or under organization `owner`
    fn create_repo(
        &self,
        owner: &str,
        ownership: Ownership,
        name: &str,
    ) -> impl Future<Output = Result<Repo>>;

    /// HTTPS clone URL for `owner/name`
    fn clone_url(&self, full_name: &str) -> String;
}

/// Host implementation selected at runtime
#[derive(Debug)]
pub enum HostClient {
    /// GitHub REST v3
    GitHub(GitHubHost),
    /// Gitee REST v5
    Gitee(GiteeHost),
}

impl HostClient {
    /// Build the client for `platform` authenticated with `token`
    pub fn new(platform: Platform, token: &str) -> Result<Self> {
        Ok(match platform {
            Platform::GitHub => HostClient::GitHub(GitHubHost::new(token)?),
            Platform::Gitee => HostClient::Gitee(GiteeHost::new(token)?),
        })
    }
}

impl RemoteHost for HostClient {
    fn platform(&self) -> Platform {
        match self {
            HostClient::GitHub(h) => h.platform(),
            HostClient::Gitee(h) => h.platform(),
        }
    }

    async fn current_user(&self) -> Result<Account> {
        match self {
            HostClient::GitHub(h) => h.current_user().await,
            HostClient::Gitee(h) => h.current_user().await,
        }
    }

    async fn organizations(&self) -> Result<Vec<Account>> {
        match self {
            HostClient::GitHub(h) => h.organizations().await,
            HostClient::Gitee(h) => h.organizations().await,
        }
    }

    async fn find_repo(&self, owner: &str, name: &str) -> Result<Option<Repo>> {
        match self {
            HostClient::GitHub(h) => h.find_repo(owner, name).await,
            HostClient::Gitee(h) => h.find_repo(owner, name).await,
        }
    }

    async fn create_repo(&self, owner: &str, ownership: Ownership, name: &str) -> Result<Repo> {
        match self {
            HostClient::GitHub(h) => h.create_repo(owner, ownership, name).await,
            HostClient::Gitee(h) => h.create_repo(owner, ownership, name).await,
        }
    }

    fn clone_url(&self, full_name: &str) -> String {
        match self {
            HostClient::GitHub(h) => h.clone_url(full_name),
            HostClient::Gitee(h) => h.clone_url(full_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_debug_redacts_token() {
        let descriptor = RemoteDescriptor {
            platform: Platform::GitHub,
            login: "octo".to_string(),
            ownership: Ownership::User,
            token: "ghp_secret".to_string(),
        };
        let rendered = format!("{descriptor:?}");
        assert!(rendered.contains("octo"));
        assert!(!rendered.contains("ghp_secret"));
    }

    #[test]
    fn test_platform_serializes_lowercase() {
        let json = serde_json::to_string(&Platform::Gitee).expect("serialize");
        assert_eq!(json, "\"gitee\"");
        let ownership: Ownership = serde_json::from_str("\"organization\"").expect("deserialize");
        assert_eq!(ownership, Ownership::Organization);
    }

    #[test]
    fn test_host_client_clone_urls() {
        let github = HostClient::new(Platform::GitHub, "t").expect("client");
        let gitee = HostClient::new(Platform::Gitee, "t").expect("client");
        assert_eq!(github.clone_url("octo/app"), "https://github.com/octo/app.git");
        assert_eq!(gitee.clone_url("octo/app"), "https://gitee.com/octo/app.git");
        assert_eq!(gitee.platform(), Platform::Gitee);
    }
}
