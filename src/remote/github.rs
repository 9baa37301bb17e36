//! GitHub REST v3 client.

use crate::error::Result;
use crate::remote::http::{ApiClient, Auth};
use crate::remote::{Account, Ownership, Platform, RemoteHost, Repo};
use serde_json::json;

const API_BASE: &str = "https://api.github.com";
const WEB_BASE: &str = "https://github.com";

/// GitHub host authenticated with a bearer token
#[derive(Debug)]
pub struct GitHubHost {
    api: ApiClient,
}

impl GitHubHost {
    /// Create a client for api.github.com
    pub fn new(token: &str) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(Platform::GitHub, API_BASE, Auth::BearerHeader, token)?,
        })
    }
}

impl RemoteHost for GitHubHost {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    async fn current_user(&self) -> Result<Account> {
        self.api.get("/user").await
    }

    async fn organizations(&self) -> Result<Vec<Account>> {
        self.api.get("/user/orgs").await
    }

    async fn find_repo(&self, owner: &str, name: &str) -> Result<Option<Repo>> {
        self.api.get_optional(&format!("/repos/{owner}/{name}")).await
    }

    async fn create_repo(&self, owner: &str, ownership: Ownership, name: &str) -> Result<Repo> {
        let path = match ownership {
            Ownership::User => "/user/repos".to_string(),
            Ownership::Organization => format!("/orgs/{owner}/repos"),
        };
        self.api.post(&path, &json!({ "name": name })).await
    }

    fn clone_url(&self, full_name: &str) -> String {
        format!("{WEB_BASE}/{full_name}.git")
    }
}
