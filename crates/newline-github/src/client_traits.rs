//! The repository client seam.
//!
//! `RepositoryClient` is everything the remediation pipeline needs from the
//! hosting platform, scoped to a single repository. `GitHubClient` talks to
//! the REST API; `fakes::MemoryRepository` satisfies the same contract in
//! memory for tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChangedFileRecord, CommitInfo, NewCommit, TreeEntry};

/// Repository-scoped access to pull request files, git objects, refs and comments.
///
/// Guarantees expected of implementations:
/// - `list_pull_request_files` pages are 1-based and hold at most
///   [`PAGE_SIZE`](crate::PAGE_SIZE) records.
/// - `create_*` return the identifier of the object they stored.
/// - `update_branch` never force-moves a ref; a non-fast-forward update fails.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// One page of the files changed by a pull request.
    async fn list_pull_request_files(
        &self,
        pr_number: u64,
        page: u32,
    ) -> Result<Vec<ChangedFileRecord>>;

    /// Read a commit object.
    async fn get_commit(&self, sha: &str) -> Result<CommitInfo>;

    /// Store UTF-8 content as a blob and return its id.
    async fn create_blob(&self, content: &str) -> Result<String>;

    /// Create a tree overlaying `entries` onto `base_tree` and return its id.
    async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String>;

    /// Create a commit object and return its id.
    async fn create_commit(&self, commit: &NewCommit) -> Result<String>;

    /// Commit id a branch currently points at.
    async fn get_branch_head(&self, branch: &str) -> Result<String>;

    /// Move a branch to `sha`. Must be a fast-forward.
    async fn update_branch(&self, branch: &str, sha: &str) -> Result<()>;

    /// Post a markdown comment on the pull request's issue thread, returning its id.
    async fn create_issue_comment(&self, pr_number: u64, body: &str) -> Result<u64>;
}
