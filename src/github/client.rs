//! GitHub REST client

use super::repo::{CommitResponse, RepoInfo, RepoRef, RepoResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = "dalec-mapper";

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("Invalid repository reference '{0}'. Expected owner/repo or a github.com URL")]
    InvalidReference(String),

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("GitHub API returned HTTP {status} for {url}: {body}")]
    Api { status: u16, url: String, body: String },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("No commit SHA for {repo} on branch {branch}")]
    MissingCommit { repo: String, branch: String },
}

/// Anything that can resolve a repository reference into metadata
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, repo: &RepoRef) -> Result<RepoInfo, GitHubError>;
}

pub struct GitHubClient {
    base_url: String,
    http_client: Client,
}

impl GitHubClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                GitHubError::Transport {
                    url: base_url.clone(),
                    message: format!("invalid token header: {}", e),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http_client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| GitHubError::Transport {
                url: base_url.clone(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn repo_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.repo)
    }

    fn commit_url(&self, repo: &RepoRef, branch: &str) -> String {
        format!("{}/commits/{}", self.repo_url(repo), branch)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        debug!("GET {}", url);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            error!("GitHub request error: {}", e);
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else if e.is_connect() {
                format!("connection failed: {}", e)
            } else {
                e.to_string()
            };
            GitHubError::Transport {
                url: url.to_string(),
                message,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("GitHub API returned error status {}: {}", status, body);
            return Err(GitHubError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GitHubError::MalformedResponse {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl MetadataSource for GitHubClient {
    async fn fetch(&self, repo: &RepoRef) -> Result<RepoInfo, GitHubError> {
        let start = Instant::now();
        let mut info = RepoInfo::new(repo);

        let repo_response: RepoResponse = self.get_json(&self.repo_url(repo)).await?;
        info.apply_repo_response(repo_response);

        let commit_response: CommitResponse = self
            .get_json(&self.commit_url(repo, &info.default_branch))
            .await?;
        info.apply_commit_response(commit_response)?;

        info!(
            repo = %repo,
            commit = %info.latest_commit,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched repository metadata"
        );

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GitHubClient {
        GitHubClient::new(base, Some("secret"), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = client("https://ghe.example.com/api/v3/");
        let repo = RepoRef::parse("acme/widget").unwrap();

        assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
        assert_eq!(
            client.repo_url(&repo),
            "https://ghe.example.com/api/v3/repos/acme/widget"
        );
        assert_eq!(
            client.commit_url(&repo, "main"),
            "https://ghe.example.com/api/v3/repos/acme/widget/commits/main"
        );
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let result = GitHubClient::new(DEFAULT_API_URL, Some("bad\ntoken"), Duration::from_secs(5));
        assert!(matches!(result, Err(GitHubError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = GitHubClient::new("http://127.0.0.1:1", None, Duration::from_secs(2)).unwrap();
        let repo = RepoRef::parse("acme/widget").unwrap();

        let err = client.fetch(&repo).await.unwrap_err();
        assert!(matches!(err, GitHubError::Transport { .. }));
    }

    #[test]
    fn test_error_messages() {
        let err = GitHubError::Api {
            status: 404,
            url: "https://api.github.com/repos/acme/nope".to_string(),
            body: "Not Found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GitHub API returned HTTP 404 for https://api.github.com/repos/acme/nope: Not Found"
        );
    }
}
