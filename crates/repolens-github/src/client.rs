use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use repolens_core::config::{AnalysisConfig, GithubConfig};
use repolens_core::types::{CommitInfo, EntryKind, FileEntry};

use crate::models::{
    normalize_commits, normalize_tree, CommitListItem, RepoResponse, TreeResponse,
};

const USER_AGENT: &str = concat!("repolens/", env!("CARGO_PKG_VERSION"));
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub API returned status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("invalid repository reference '{0}' (expected owner/repo)")]
    InvalidRepo(String),
}

/// Everything the dashboard needs from one repository, already normalized
/// into engine types at this boundary.
#[derive(Debug, Clone)]
pub struct RepositorySnapshot {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub default_branch: String,
    pub entries: Vec<FileEntry>,
    pub commits: Vec<CommitInfo>,
    /// Set when GitHub truncated the recursive tree listing.
    pub truncated: bool,
}

/// Async client for the GitHub REST API.
pub struct GithubClient {
    http: Client,
    api_base: String,
    commit_page_size: u32,
    analysis: AnalysisConfig,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(github: &GithubConfig, analysis: &AnalysisConfig, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: github.api_base.trim_end_matches('/').to_string(),
            commit_page_size: github.commit_page_size,
            analysis: analysis.clone(),
            token,
        }
    }

    /// Fetch a complete snapshot for `owner/repo`: metadata, the recursive
    /// tree, the first commit page, and raw content for allow-listed files.
    pub async fn fetch_repository(&self, reference: &str) -> Result<RepositorySnapshot, GithubError> {
        let (owner, repo) = parse_reference(reference)?;

        let info: RepoResponse = self
            .get_json(&format!("{}/repos/{owner}/{repo}", self.api_base))
            .await?;

        let tree: TreeResponse = self
            .get_json(&format!(
                "{}/repos/{owner}/{repo}/git/trees/{}?recursive=1",
                self.api_base, info.default_branch
            ))
            .await?;
        let truncated = tree.truncated;
        let mut entries = normalize_tree(tree.tree);

        let commit_page: Vec<CommitListItem> = self
            .get_json(&format!(
                "{}/repos/{owner}/{repo}/commits?per_page={}",
                self.api_base, self.commit_page_size
            ))
            .await?;
        let commits = normalize_commits(commit_page);

        self.attach_contents(owner, repo, &mut entries).await;

        Ok(RepositorySnapshot {
            name: info.name,
            full_name: info.full_name,
            description: info.description,
            default_branch: info.default_branch,
            entries,
            commits,
            truncated,
        })
    }

    /// Attach raw text to allow-listed manifest/config blobs. Best effort:
    /// a failed content fetch leaves the entry without content.
    async fn attach_contents(&self, owner: &str, repo: &str, entries: &mut [FileEntry]) {
        for entry in entries.iter_mut() {
            if entry.kind != EntryKind::Blob {
                continue;
            }
            if !self.analysis.is_content_file(entry.file_name()) {
                continue;
            }
            if entry.size.is_some_and(|s| s > self.analysis.max_content_bytes) {
                tracing::debug!(path = %entry.path, "skipping oversized content file");
                continue;
            }
            let url = format!(
                "{}/repos/{owner}/{repo}/contents/{}",
                self.api_base, entry.path
            );
            match self.get_raw(&url).await {
                Ok(text) => entry.content = Some(text),
                Err(e) => {
                    tracing::warn!(path = %entry.path, error = %e, "content fetch failed, continuing without it");
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GithubError> {
        let mut request = self.http.get(url).header("User-Agent", USER_AGENT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    async fn get_raw(&self, url: &str) -> Result<String, GithubError> {
        let mut request = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", RAW_MEDIA_TYPE);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Split an `owner/repo` reference. Anything else is a usage error.
pub fn parse_reference(reference: &str) -> Result<(&str, &str), GithubError> {
    let mut parts = reference.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner, repo))
        }
        _ => Err(GithubError::InvalidRepo(reference.to_string())),
    }
}
