//! Shared JSON-over-HTTPS plumbing for host clients.

use crate::error::{RemoteError, Result};
use crate::remote::Platform;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Request timeout applied to every API call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(50);

/// How the token is attached to requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Auth {
    /// `Authorization: Bearer <token>`
    BearerHeader,
    /// `?access_token=<token>`
    QueryParameter,
}

pub(super) struct ApiClient {
    client: Client,
    base_url: String,
    platform: Platform,
    auth: Auth,
    token: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("platform", &self.platform)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub(super) fn new(platform: Platform, base_url: &str, auth: Auth, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| RemoteError::Network {
                platform: platform.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            platform,
            auth,
            token: token.to_string(),
        })
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        log::debug!("{} {} {}", self.platform, method, url);
        let builder = self.client.request(method, url);
        match self.auth {
            Auth::BearerHeader => builder
                .bearer_auth(&self.token)
                .header("Accept", "application/vnd.github+json"),
            Auth::QueryParameter => builder.query(&[("access_token", self.token.as_str())]),
        }
    }

    /// GET a JSON resource
    pub(super) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        match self.send(Method::GET, path, None::<&()>).await? {
            Some(value) => Ok(value),
            None => Err(self.status_error(&Method::GET, path, StatusCode::NOT_FOUND, String::new())),
        }
    }

    /// GET a JSON resource, `None` on 404
    pub(super) async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.send(Method::GET, path, None::<&()>).await
    }

    /// POST a JSON body, decoding the JSON response
    pub(super) async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        match self.send(Method::POST, path, Some(body)).await? {
            Some(value) => Ok(value),
            None => Err(self.status_error(&Method::POST, path, StatusCode::NOT_FOUND, String::new())),
        }
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>> {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|source| self.network(source))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let rate_limit_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if rate_limit_exhausted && status == StatusCode::FORBIDDEN {
                return Err(RemoteError::RateLimited {
                    platform: self.platform.to_string(),
                }
                .into());
            }
            return Err(self.status_error(&method, path, status, text));
        }

        let value = response.json::<T>().await.map_err(|source| self.network(source))?;
        Ok(Some(value))
    }

    fn network(&self, source: reqwest::Error) -> crate::error::ReleaseError {
        RemoteError::Network {
            platform: self.platform.to_string(),
            source,
        }
        .into()
    }

    fn status_error(
        &self,
        method: &Method,
        path: &str,
        status: StatusCode,
        body: String,
    ) -> crate::error::ReleaseError {
        classify_status(self.platform, method, &self.url(path), status, body).into()
    }
}

/// Map a non-success status to the matching [`RemoteError`]
pub(super) fn classify_status(
    platform: Platform,
    method: &Method,
    url: &str,
    status: StatusCode,
    body: String,
) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED => RemoteError::AuthenticationFailed {
            platform: platform.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => RemoteError::RateLimited {
            platform: platform.to_string(),
        },
        _ => RemoteError::RequestFailed {
            platform: platform.to_string(),
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = ApiClient::new(Platform::GitHub, "https://api.github.com/", Auth::BearerHeader, "t")
            .expect("client");
        assert_eq!(api.url("/user"), "https://api.github.com/user");
        assert_eq!(api.url("repos/a/b"), "https://api.github.com/repos/a/b");
    }

    #[test]
    fn test_debug_hides_token() {
        let api = ApiClient::new(Platform::Gitee, "https://gitee.com/api/v5", Auth::QueryParameter, "secret")
            .expect("client");
        assert!(!format!("{api:?}").contains("secret"));
    }

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_status(
            Platform::Gitee,
            &Method::GET,
            "https://gitee.com/api/v5/user",
            StatusCode::UNAUTHORIZED,
            String::new(),
        );
        assert!(matches!(err, RemoteError::AuthenticationFailed { .. }));
    }

    #[test]
    fn test_classify_rate_limited() {
        let err = classify_status(
            Platform::GitHub,
            &Method::GET,
            "u",
            StatusCode::TOO_MANY_REQUESTS,
            String::new(),
        );
        assert!(matches!(err, RemoteError::RateLimited { .. }));
    }

    #[test]
    fn test_classify_other_keeps_body() {
        let err = classify_status(
            Platform::GitHub,
            &Method::POST,
            "https://api.github.com/user/repos",
            StatusCode::UNPROCESSABLE_ENTITY,
            "name already exists".to_string(),
        );
        match err {
            RemoteError::RequestFailed { status, body, method, .. } => {
                assert_eq!(status, 422);
                assert_eq!(method, "POST");
                assert_eq!(body, "name already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
