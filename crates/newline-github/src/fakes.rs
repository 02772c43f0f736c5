//! In-memory fake of [`RepositoryClient`] (testing only)
//!
//! `MemoryRepository` serves a fixed list of changed files in pages of
//! [`PAGE_SIZE`], mints content-derived object ids, and records every object,
//! ref move and comment so tests can inspect what a run did. Any single
//! operation can be made to fail with [`MemoryRepository::fail_on`].

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::client_traits::RepositoryClient;
use crate::error::{GitHubError, Operation, Result};
use crate::types::{ChangedFileRecord, CommitInfo, NewCommit, TreeEntry, PAGE_SIZE};

/// A tree created through the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTree {
    pub base_tree: String,
    pub entries: Vec<TreeEntry>,
}

#[derive(Debug, Default)]
struct State {
    page_fetches: Vec<u32>,
    blobs: HashMap<String, String>,
    trees: HashMap<String, StoredTree>,
    commits: HashMap<String, NewCommit>,
    refs: HashMap<String, String>,
    comments: Vec<(u64, String)>,
    calls: Vec<Operation>,
}

/// In-memory repository.
#[derive(Debug)]
pub struct MemoryRepository {
    changed_files: Vec<ChangedFileRecord>,
    base_commits: HashMap<String, String>,
    failing: Mutex<HashSet<Operation>>,
    state: Mutex<State>,
}

fn object_id(kind: &str, payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update([0u8]);
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

impl MemoryRepository {
    /// Repository whose `branch` points at `head_sha`, a commit with tree `head_tree`.
    pub fn new(branch: &str, head_sha: &str, head_tree: &str) -> Self {
        let mut base_commits = HashMap::new();
        base_commits.insert(head_sha.to_string(), head_tree.to_string());
        let state = State {
            refs: HashMap::from([(branch.to_string(), head_sha.to_string())]),
            ..State::default()
        };
        Self {
            changed_files: Vec::new(),
            base_commits,
            failing: Mutex::new(HashSet::new()),
            state: Mutex::new(state),
        }
    }

    /// Files the pull request reports as changed, in listing order.
    pub fn with_changed_files(mut self, files: Vec<ChangedFileRecord>) -> Self {
        self.changed_files = files;
        self
    }

    /// Make every subsequent call of `operation` fail with HTTP 500.
    pub fn fail_on(&self, operation: Operation) {
        self.failing.lock().unwrap().insert(operation);
    }

    /// Pages requested so far, in request order.
    pub fn page_fetches(&self) -> Vec<u32> {
        self.state.lock().unwrap().page_fetches.clone()
    }

    /// Every operation attempted, in call order (failed ones included).
    pub fn calls(&self) -> Vec<Operation> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn blob(&self, sha: &str) -> Option<String> {
        self.state.lock().unwrap().blobs.get(sha).cloned()
    }

    pub fn blob_count(&self) -> usize {
        self.state.lock().unwrap().blobs.len()
    }

    pub fn tree(&self, sha: &str) -> Option<StoredTree> {
        self.state.lock().unwrap().trees.get(sha).cloned()
    }

    /// Commits created through the fake.
    pub fn created_commits(&self) -> Vec<NewCommit> {
        let state = self.state.lock().unwrap();
        state.commits.values().cloned().collect()
    }

    pub fn commit(&self, sha: &str) -> Option<NewCommit> {
        self.state
            .lock()
            .unwrap()
            .commits
            .get(sha)
            .cloned()
    }

    /// Where `branch` points now.
    pub fn branch_head(&self, branch: &str) -> Option<String> {
        self.state.lock().unwrap().refs.get(branch).cloned()
    }

    /// Move a branch behind the pipeline's back, as a concurrent push would.
    pub fn force_branch(&self, branch: &str, sha: &str) {
        self.state
            .lock()
            .unwrap()
            .refs
            .insert(branch.to_string(), sha.to_string());
    }

    /// Comments posted so far as `(pr_number, body)`.
    pub fn comments(&self) -> Vec<(u64, String)> {
        self.state.lock().unwrap().comments.clone()
    }

    fn enter(&self, operation: Operation) -> Result<()> {
        self.state.lock().unwrap().calls.push(operation);
        if self.failing.lock().unwrap().contains(&operation) {
            return Err(GitHubError::Status {
                operation,
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(operation: Operation, what: &str) -> GitHubError {
        GitHubError::Status {
            operation,
            status: 404,
            message: format!("{what} not found"),
        }
    }

    fn is_ancestor(state: &State, ancestor: &str, descendant: &str) -> bool {
        let mut current = descendant.to_string();
        loop {
            if current == ancestor {
                return true;
            }
            match state.commits.get(&current) {
                Some(commit) => match commit.parents.first() {
                    Some(parent) => current = parent.clone(),
                    None => return false,
                },
                None => return false,
            }
        }
    }
}

#[async_trait]
impl RepositoryClient for MemoryRepository {
    async fn list_pull_request_files(
        &self,
        _pr_number: u64,
        page: u32,
    ) -> Result<Vec<ChangedFileRecord>> {
        self.state.lock().unwrap().page_fetches.push(page);
        self.enter(Operation::ListFiles)?;
        let start = (page.saturating_sub(1) as usize) * PAGE_SIZE;
        Ok(self
            .changed_files
            .iter()
            .skip(start)
            .take(PAGE_SIZE)
            .cloned()
            .collect())
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitInfo> {
        self.enter(Operation::GetCommit)?;
        if let Some(tree) = self.base_commits.get(sha) {
            return Ok(CommitInfo {
                sha: sha.to_string(),
                tree: tree.clone(),
            });
        }
        let state = self.state.lock().unwrap();
        state
            .commits
            .get(sha)
            .map(|commit| CommitInfo {
                sha: sha.to_string(),
                tree: commit.tree.clone(),
            })
            .ok_or_else(|| Self::not_found(Operation::GetCommit, sha))
    }

    async fn create_blob(&self, content: &str) -> Result<String> {
        self.enter(Operation::CreateBlob)?;
        let sha = object_id("blob", content.as_bytes());
        self.state
            .lock()
            .unwrap()
            .blobs
            .insert(sha.clone(), content.to_string());
        Ok(sha)
    }

    async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        self.enter(Operation::CreateTree)?;
        let mut state = self.state.lock().unwrap();
        if let Some(missing) = entries.iter().find(|e| !state.blobs.contains_key(&e.sha)) {
            return Err(Self::not_found(Operation::CreateTree, &missing.sha));
        }
        let payload = serde_json::to_vec(&(base_tree, entries)).unwrap_or_default();
        let sha = object_id("tree", &payload);
        state.trees.insert(
            sha.clone(),
            StoredTree {
                base_tree: base_tree.to_string(),
                entries: entries.to_vec(),
            },
        );
        Ok(sha)
    }

    async fn create_commit(&self, commit: &NewCommit) -> Result<String> {
        self.enter(Operation::CreateCommit)?;
        let mut state = self.state.lock().unwrap();
        if !state.trees.contains_key(&commit.tree) {
            return Err(Self::not_found(Operation::CreateCommit, &commit.tree));
        }
        let payload = serde_json::to_vec(commit).unwrap_or_default();
        let sha = object_id("commit", &payload);
        state.commits.insert(sha.clone(), commit.clone());
        Ok(sha)
    }

    async fn get_branch_head(&self, branch: &str) -> Result<String> {
        self.enter(Operation::GetRef)?;
        self.state
            .lock()
            .unwrap()
            .refs
            .get(branch)
            .cloned()
            .ok_or_else(|| Self::not_found(Operation::GetRef, branch))
    }

    async fn update_branch(&self, branch: &str, sha: &str) -> Result<()> {
        self.enter(Operation::UpdateRef)?;
        let mut state = self.state.lock().unwrap();
        let current = state
            .refs
            .get(branch)
            .cloned()
            .ok_or_else(|| Self::not_found(Operation::UpdateRef, branch))?;
        if !Self::is_ancestor(&state, &current, sha) {
            return Err(GitHubError::Status {
                operation: Operation::UpdateRef,
                status: 422,
                message: "Update is not a fast forward".to_string(),
            });
        }
        state.refs.insert(branch.to_string(), sha.to_string());
        Ok(())
    }

    async fn create_issue_comment(&self, pr_number: u64, body: &str) -> Result<u64> {
        self.enter(Operation::CreateComment)?;
        let mut state = self.state.lock().unwrap();
        state.comments.push((pr_number, body.to_string()));
        Ok(state.comments.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CommitIdentity, FileStatus};

    fn identity() -> CommitIdentity {
        CommitIdentity {
            name: "bot".to_string(),
            email: "bot@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn pages_are_sliced_by_page_size() {
        let files = (0..150)
            .map(|i| ChangedFileRecord::new(format!("f{i}.txt"), FileStatus::Added))
            .collect();
        let repo = MemoryRepository::new("main", "c0", "t0").with_changed_files(files);

        assert_eq!(repo.list_pull_request_files(1, 1).await.unwrap().len(), 100);
        assert_eq!(repo.list_pull_request_files(1, 2).await.unwrap().len(), 50);
        assert!(repo.list_pull_request_files(1, 3).await.unwrap().is_empty());
        assert_eq!(repo.page_fetches(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn fast_forward_is_accepted_and_sideways_move_rejected() {
        let repo = MemoryRepository::new("feature", "c0", "t0");
        let blob = repo.create_blob("x\n").await.unwrap();
        let tree = repo
            .create_tree("t0", &[TreeEntry::blob("x.txt", blob)])
            .await
            .unwrap();

        let orphan = repo
            .create_commit(&NewCommit {
                message: "orphan".to_string(),
                tree: tree.clone(),
                parents: vec![],
                author: identity(),
            })
            .await
            .unwrap();
        let err = repo.update_branch("feature", &orphan).await.unwrap_err();
        assert!(matches!(err, GitHubError::Status { status: 422, .. }));
        assert_eq!(repo.branch_head("feature").as_deref(), Some("c0"));

        let child = repo
            .create_commit(&NewCommit {
                message: "child".to_string(),
                tree,
                parents: vec!["c0".to_string()],
                author: identity(),
            })
            .await
            .unwrap();
        repo.update_branch("feature", &child).await.unwrap();
        assert_eq!(repo.branch_head("feature"), Some(child));
    }

    #[tokio::test]
    async fn injected_failure_is_reported_with_operation() {
        let repo = MemoryRepository::new("main", "c0", "t0");
        repo.fail_on(Operation::CreateBlob);
        let err = repo.create_blob("data").await.unwrap_err();
        assert_eq!(err.operation(), Some(Operation::CreateBlob));
        assert_eq!(repo.blob_count(), 0);
    }
}
