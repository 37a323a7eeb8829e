//! Repository references and API response mapping

use super::GitHubError;
use crate::transform::RepoMetadata;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const DEFAULT_BRANCH: &str = "main";
const NO_LICENSE: &str = "NOASSERTION";

/// `owner/repo`, optionally prefixed with a github.com host or URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn parse(input: &str) -> Result<Self, GitHubError> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| {
            Regex::new(r"^(?:https?://)?(?:www\.)?(?:github\.com/)?([\w.-]+)/([\w.-]+?)(?:\.git)?/?$")
                .expect("valid regex")
        });

        let captures = pattern
            .captures(input.trim())
            .ok_or_else(|| GitHubError::InvalidReference(input.to_string()))?;

        let (owner, repo) = (&captures[1], &captures[2]);
        // A bare host is matched as an owner by the optional prefix
        let host_as_owner = ["github.com", "www.github.com"]
            .iter()
            .any(|host| owner.eq_ignore_ascii_case(host));
        let relative_segment = [owner, repo].iter().any(|part| matches!(*part, "." | ".."));
        if host_as_owner || relative_segment {
            return Err(GitHubError::InvalidReference(input.to_string()));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// `GET /repos/{owner}/{repo}`, only the fields used here
#[derive(Debug, Default, Deserialize)]
pub struct RepoResponse {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub license: Option<LicenseResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LicenseResponse {
    #[serde(default)]
    pub spdx_id: Option<String>,
}

/// `GET /repos/{owner}/{repo}/commits/{ref}`
#[derive(Debug, Default, Deserialize)]
pub struct CommitResponse {
    #[serde(default)]
    pub sha: Option<String>,
}

/// Resolved repository information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoInfo {
    pub owner: String,
    pub repo: String,
    pub full_name: String,
    pub description: String,
    pub website: String,
    pub git_url: String,
    pub license: String,
    pub latest_commit: String,
    pub default_branch: String,
}

impl RepoInfo {
    /// Starting values before any API response is applied
    pub fn new(repo_ref: &RepoRef) -> Self {
        let url = repo_ref.html_url();
        Self {
            owner: repo_ref.owner.clone(),
            repo: repo_ref.repo.clone(),
            full_name: repo_ref.to_string(),
            description: String::new(),
            website: url.clone(),
            git_url: url,
            license: String::new(),
            latest_commit: String::new(),
            default_branch: DEFAULT_BRANCH.to_string(),
        }
    }

    pub fn apply_repo_response(&mut self, response: RepoResponse) {
        if let Some(description) = response.description {
            self.description = description;
        }
        if let Some(homepage) = response.homepage.filter(|h| !h.is_empty()) {
            self.website = homepage;
        }
        if let Some(branch) = response.default_branch.filter(|b| !b.is_empty()) {
            self.default_branch = branch;
        }
        if let Some(spdx) = response
            .license
            .and_then(|license| license.spdx_id)
            .filter(|id| !id.is_empty() && id != NO_LICENSE)
        {
            self.license = spdx;
        }
    }

    pub fn apply_commit_response(&mut self, response: CommitResponse) -> Result<(), GitHubError> {
        let sha = response
            .sha
            .filter(|sha| !sha.is_empty())
            .ok_or_else(|| GitHubError::MissingCommit {
                repo: self.full_name.clone(),
                branch: self.default_branch.clone(),
            })?;
        self.latest_commit = sha;
        Ok(())
    }

    pub fn to_metadata(&self) -> RepoMetadata {
        RepoMetadata {
            git_url: self.git_url.clone(),
            commit: self.latest_commit.clone(),
            website: self.website.clone(),
            description: self.description.clone(),
            license: self.license.clone(),
            repo_name: self.repo.clone(),
        }
    }
}
