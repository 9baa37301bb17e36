//! Gitee REST v5 client.
//!
//! Gitee takes the access token as a query parameter rather than a header.

use crate::error::Result;
use crate::remote::http::{ApiClient, Auth};
use crate::remote::{Account, Ownership, Platform, RemoteHost, Repo};
use serde_json::json;

const API_BASE: &str = "https://gitee.com/api/v5";
const WEB_BASE: &str = "https://gitee.com";

/// Gitee host authenticated with a personal access token
#[derive(Debug)]
pub struct GiteeHost {
    api: ApiClient,
}

impl GiteeHost {
    /// Create a client for gitee.com
    pub fn new(token: &str) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(Platform::Gitee, API_BASE, Auth::QueryParameter, token)?,
        })
    }
}

impl RemoteHost for GiteeHost {
    fn platform(&self) -> Platform {
        Platform::Gitee
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
