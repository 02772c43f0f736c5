//! newline-github: hosting-platform layer for newline-fix
//!
//! Everything the remediation pipeline reads from or writes to GitHub goes
//! through the [`RepositoryClient`] trait:
//! - paginated pull request file listings
//! - git blob, tree and commit creation
//! - fast-forward-only branch updates
//! - issue comments
//!
//! [`GitHubClient`] implements it over the REST API. An in-memory fake is
//! provided for testing via the [`fakes`] module.

pub mod client_traits;
pub mod error;
pub mod fakes;
pub mod http;
pub mod types;

pub use client_traits::RepositoryClient;
pub use error::{GitHubError, Operation, Result};
pub use http::{GitHubClient, GitHubConfig, RepoSlug, DEFAULT_API_URL};
pub use types::{
    ChangedFileRecord, CommitIdentity, CommitInfo, FileMode, FileStatus, NewCommit, ObjectType,
    TreeEntry, PAGE_SIZE,
};
