//! Single-commit folding of fixes onto the pull request branch.
//!
//! Objects are created bottom-up (blobs, tree, commit) and the branch ref is
//! moved last. A failure at any step returns before the ref is touched, so the
//! worst case is a few orphaned objects on the platform.

use newline_github::{CommitIdentity, NewCommit, RepositoryClient, TreeEntry};
use tracing::{debug, info};

use crate::context::PullRequestContext;
use crate::error::{NewlineError, Result};
use crate::fixer::FixResult;
use crate::obs;

/// Message of every fix commit.
pub const COMMIT_MESSAGE: &str = "Fixed final line endings with newline-fix.";

/// Author of every fix commit.
pub fn bot_identity() -> CommitIdentity {
    CommitIdentity {
        name: "newline-fix[bot]".to_string(),
        email: "newline-fix[bot]@users.noreply.github.com".to_string(),
    }
}

/// What a successful fold produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub commit_sha: String,
    pub tree_sha: String,
    pub entries: Vec<TreeEntry>,
}

/// Create one blob per fix, in order, and pair each with its path.
pub async fn create_tree_entries(
    client: &dyn RepositoryClient,
    fixes: &[FixResult],
) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::with_capacity(fixes.len());
    for fix in fixes {
        let sha = client.create_blob(&fix.content).await?;
        debug!(path = %fix.path, sha = %sha, "blob created");
        entries.push(TreeEntry::blob(fix.path.trim_start_matches('/'), sha));
    }
    Ok(entries)
}

/// Fold all fixes into one commit on the PR head branch.
///
/// The commit's only parent is the PR head commit. Before the ref moves the
/// branch is re-read; if it no longer points at the head commit the run
/// stops with [`NewlineError::BranchMoved`] and the branch is left alone.
pub async fn commit_fixes(
    client: &dyn RepositoryClient,
    pr: &PullRequestContext,
    fixes: &[FixResult],
) -> Result<CommitOutcome> {
    info!("Committing files...");
    let head = client.get_commit(&pr.head_sha).await?;
    let entries = create_tree_entries(client, fixes).await?;
    let tree_sha = client.create_tree(&head.tree, &entries).await?;
    debug!(tree = %tree_sha, base = %head.tree, "tree created");

    let commit = NewCommit {
        message: COMMIT_MESSAGE.to_string(),
        tree: tree_sha.clone(),
        parents: vec![pr.head_sha.clone()],
        author: bot_identity(),
    };
    let commit_sha = client.create_commit(&commit).await?;

    let current = client.get_branch_head(&pr.head_ref).await?;
    if current != pr.head_sha {
        return Err(NewlineError::BranchMoved {
            branch: pr.head_ref.clone(),
            expected: pr.head_sha.clone(),
            actual: current,
        });
    }
    client.update_branch(&pr.head_ref, &commit_sha).await?;
    obs::emit_commit_created(&commit_sha, &pr.head_ref, entries.len());

    Ok(CommitOutcome {
        commit_sha,
        tree_sha,
        entries,
    })
}
