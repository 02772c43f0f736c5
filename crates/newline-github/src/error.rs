//! Error types for newline-github

use thiserror::Error;

/// Remote operations a `RepositoryClient` performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListFiles,
    GetCommit,
    CreateBlob,
    CreateTree,
    CreateCommit,
    GetRef,
    UpdateRef,
    CreateComment,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Operation::ListFiles => "list pull request files",
            Operation::GetCommit => "get commit",
            Operation::CreateBlob => "create blob",
            Operation::CreateTree => "create tree",
            Operation::CreateCommit => "create commit",
            Operation::GetRef => "get ref",
            Operation::UpdateRef => "update ref",
            Operation::CreateComment => "create comment",
        };
        f.write_str(s)
    }
}

/// Errors talking to the hosting platform. Every variant is a transport failure.
#[derive(Error, Debug)]
pub enum GitHubError {
    /// The request never produced a response
    #[error("{operation} request failed: {source}")]
    Request {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// The platform answered with a non-success status
    #[error("{operation} returned HTTP {status}: {message}")]
    Status {
        operation: Operation,
        status: u16,
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("{operation} response could not be decoded: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// Token contains characters not allowed in a header
    #[error("authentication token is not a valid header value")]
    InvalidToken,

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A request URL could not be built from the API base
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl GitHubError {
    /// The operation that failed, when known.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            GitHubError::Request { operation, .. }
            | GitHubError::Status { operation, .. }
            | GitHubError::Decode { operation, .. } => Some(*operation),
            GitHubError::InvalidToken | GitHubError::Client(_) | GitHubError::InvalidUrl(_) => {
                None
            }
        }
    }
}

/// Result type for hosting-platform calls
pub type Result<T> = std::result::Result<T, GitHubError>;
