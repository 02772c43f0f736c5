//! Wire-level types shared by every `RepositoryClient` implementation.

use serde::{Deserialize, Serialize};

/// Records returned per page by the pull request files listing.
///
/// A page holding fewer records than this is the last one.
pub const PAGE_SIZE: usize = 100;

/// Change status of a file in a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FileStatus::Added => "added",
            FileStatus::Removed => "removed",
            FileStatus::Modified => "modified",
            FileStatus::Renamed => "renamed",
            FileStatus::Copied => "copied",
            FileStatus::Changed => "changed",
            FileStatus::Unchanged => "unchanged",
            FileStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One file touched by a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFileRecord {
    /// Repo-relative path, `/` separated
    pub filename: String,
    /// Change status reported by the platform
    pub status: FileStatus,
}

impl ChangedFileRecord {
    pub fn new(filename: impl Into<String>, status: FileStatus) -> Self {
        Self {
            filename: filename.into(),
            status,
        }
    }
}

/// Git file mode of a tree entry. Only regular files are ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMode {
    #[serde(rename = "100644")]
    Regular,
}

/// Git object type of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Blob,
}

/// An entry overlaid onto a base tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: FileMode,
    #[serde(rename = "type")]
    pub kind: ObjectType,
    pub sha: String,
}

impl TreeEntry {
    /// Regular-file blob entry at `path`.
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: FileMode::Regular,
            kind: ObjectType::Blob,
            sha: sha.into(),
        }
    }
}

/// Author identity attached to created commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Parameters of a commit object to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCommit {
    pub message: String,
    pub tree: String,
    pub parents: Vec<String>,
    pub author: CommitIdentity,
}

/// The parts of an existing commit the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub tree: String,
}
