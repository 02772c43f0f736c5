//! GitHub REST API client
//!
//! Implements [`RepositoryClient`] over `reqwest`. One client is bound to one
//! repository; it is built once at process start and passed by reference to
//! every stage of a run.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client_traits::RepositoryClient;
use crate::error::{GitHubError, Operation, Result};
use crate::types::{
    ChangedFileRecord, CommitIdentity, CommitInfo, NewCommit, TreeEntry, PAGE_SIZE,
};

/// Default public API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// GitHub client configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// REST API base URL
    pub api_url: String,
    /// Token sent as a bearer credential
    pub token: String,
}

impl GitHubConfig {
    /// Config for the public API with the given token
    pub fn new(token: &str) -> Self {
        GitHubConfig {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.to_string(),
        }
    }

    /// Point the client at a different API base (GitHub Enterprise, mock servers)
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }
}

/// Owner and name of the repository a client is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: &str, name: &str) -> Self {
        RepoSlug {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// REST client for one repository
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    repo: RepoSlug,
}

#[derive(Deserialize)]
struct ShaResponse {
    sha: String,
}

#[derive(Deserialize)]
struct CommitResponse {
    sha: String,
    tree: ShaResponse,
}

#[derive(Deserialize)]
struct RefResponse {
    object: ShaResponse,
}

#[derive(Deserialize)]
struct CommentResponse {
    id: u64,
}

#[derive(Serialize)]
struct CreateBlobRequest<'a> {
    content: &'a str,
    encoding: &'static str,
}

#[derive(Serialize)]
struct CreateTreeRequest<'a> {
    base_tree: &'a str,
    tree: &'a [TreeEntry],
}

#[derive(Serialize)]
struct CreateCommitRequest<'a> {
    message: &'a str,
    tree: &'a str,
    parents: &'a [String],
    author: &'a CommitIdentity,
}

#[derive(Serialize)]
struct UpdateRefRequest<'a> {
    sha: &'a str,
    force: bool,
}

#[derive(Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

impl GitHubClient {
    /// Create a new client bound to `repo`
    pub fn new(config: GitHubConfig, repo: RepoSlug) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| GitHubError::InvalidToken)?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .user_agent(concat!("newline-fix/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(GitHubError::Client)?;

        Ok(GitHubClient {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repo,
        })
    }

    /// Repository this client is bound to
    pub fn repo(&self) -> &RepoSlug {
        &self.repo
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.repo.owner, self.repo.name, path
        )
    }

    /// URL of a branch ref under `prefix`, one escaped path segment per
    /// `/`-separated component of `branch`.
    fn branch_url(&self, prefix: &str, branch: &str) -> Result<Url> {
        let mut url = Url::parse(&self.repo_url(prefix))
            .map_err(|e| GitHubError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GitHubError::InvalidUrl(self.api_url.clone()))?
            .extend(branch.split('/'));
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|source| GitHubError::Request { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GitHubError::Status {
                operation,
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| GitHubError::Decode { operation, source })
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    async fn list_pull_request_files(
        &self,
        pr_number: u64,
        page: u32,
    ) -> Result<Vec<ChangedFileRecord>> {
        let url = self.repo_url(&format!("pulls/{pr_number}/files"));
        let request = self
            .http
            .get(url)
            .query(&[("per_page", PAGE_SIZE as u32), ("page", page)]);
        let files: Vec<ChangedFileRecord> = self.send(Operation::ListFiles, request).await?;
        debug!(page, count = files.len(), "listed pull request files");
        Ok(files)
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitInfo> {
        let url = self.repo_url(&format!("git/commits/{sha}"));
        let commit: CommitResponse = self.send(Operation::GetCommit, self.http.get(url)).await?;
        Ok(CommitInfo {
            sha: commit.sha,
            tree: commit.tree.sha,
        })
    }

    async fn create_blob(&self, content: &str) -> Result<String> {
        let body = CreateBlobRequest {
            content,
            encoding: "utf-8",
        };
        let request = self.http.post(self.repo_url("git/blobs")).json(&body);
        let blob: ShaResponse = self.send(Operation::CreateBlob, request).await?;
        debug!(sha = %blob.sha, "created blob");
        Ok(blob.sha)
    }

    async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        let body = CreateTreeRequest {
            base_tree,
            tree: entries,
        };
        let request = self.http.post(self.repo_url("git/trees")).json(&body);
        let tree: ShaResponse = self.send(Operation::CreateTree, request).await?;
        debug!(sha = %tree.sha, entries = entries.len(), "created tree");
        Ok(tree.sha)
    }

    async fn create_commit(&self, commit: &NewCommit) -> Result<String> {
        let body = CreateCommitRequest {
            message: &commit.message,
            tree: &commit.tree,
            parents: &commit.parents,
            author: &commit.author,
        };
        let request = self.http.post(self.repo_url("git/commits")).json(&body);
        let created: ShaResponse = self.send(Operation::CreateCommit, request).await?;
        debug!(sha = %created.sha, "created commit");
        Ok(created.sha)
    }

    async fn get_branch_head(&self, branch: &str) -> Result<String> {
        let url = self.branch_url("git/ref/heads", branch)?;
        let git_ref: RefResponse = self.send(Operation::GetRef, self.http.get(url)).await?;
        Ok(git_ref.object.sha)
    }

    async fn update_branch(&self, branch: &str, sha: &str) -> Result<()> {
        let url = self.branch_url("git/refs/heads", branch)?;
        let body = UpdateRefRequest { sha, force: false };
        let _: RefResponse = self
            .send(Operation::UpdateRef, self.http.patch(url).json(&body))
            .await?;
        Ok(())
    }

    async fn create_issue_comment(&self, pr_number: u64, body: &str) -> Result<u64> {
        let url = self.repo_url(&format!("issues/{pr_number}/comments"));
        let request = self.http.post(url).json(&CreateCommentRequest { body });
        let comment: CommentResponse = self.send(Operation::CreateComment, request).await?;
        Ok(comment.id)
    }
}
