//! Error taxonomy for the remediation pipeline.
//!
//! Only fatal causes are errors. Config problems fall back to defaults
//! ([`ConfigError`] never leaves `Config::load_or_default`) and skipped files
//! are [`SkipReason`](crate::filter::SkipReason) values.

use std::path::PathBuf;

use newline_github::GitHubError;

/// Reasons a config file could not be used. Never fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Fatal pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum NewlineError {
    #[error("transport failure: {0}")]
    Transport(#[from] GitHubError),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot list repository files: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("branch {branch} moved from {expected} to {actual}; refusing to update it")]
    BranchMoved {
        branch: String,
        expected: String,
        actual: String,
    },

    #[error("invalid event payload: {0}")]
    InvalidEvent(String),
}

impl NewlineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NewlineError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether a remote call to the hosting platform caused this error.
    pub fn is_transport(&self) -> bool {
        matches!(self, NewlineError::Transport(_))
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, NewlineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use newline_github::Operation;

    #[test]
    fn transport_errors_are_flagged() {
        let err: NewlineError = GitHubError::Status {
            operation: Operation::CreateBlob,
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(err.is_transport());
        assert!(err.to_string().contains("create blob"));
    }

    #[test]
    fn branch_moved_names_both_commits() {
        let err = NewlineError::BranchMoved {
            branch: "feature".to_string(),
            expected: "abc123".to_string(),
            actual: "def456".to_string(),
        };
        assert!(!err.is_transport());
        let msg = err.to_string();
        assert!(msg.contains("abc123"));
        assert!(msg.contains("def456"));
    }
}
