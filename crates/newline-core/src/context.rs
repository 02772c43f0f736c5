//! Pull request context and event gating.
//!
//! The context is read once from the webhook event payload and stays
//! immutable for the whole run.

use std::path::Path;

use serde::Deserialize;

use crate::error::{NewlineError, Result};

/// Event name that triggers remediation.
pub const PULL_REQUEST_EVENT: &str = "pull_request";

/// Pull request actions that carry new commits worth checking.
pub const HANDLED_ACTIONS: &[&str] = &["opened", "synchronize"];

/// The pull request a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContext {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    pub head_sha: String,
    pub head_ref: String,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    action: Option<String>,
    pull_request: Option<PullRequestPayload>,
    repository: Option<RepositoryPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    head: HeadPayload,
}

#[derive(Debug, Deserialize)]
struct HeadPayload {
    sha: String,
    #[serde(rename = "ref")]
    git_ref: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    name: String,
    owner: OwnerPayload,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
}

/// A parsed webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub action: Option<String>,
    pub context: Option<PullRequestContext>,
}

impl PullRequestEvent {
    /// Parse the event payload JSON.
    ///
    /// `context` is `None` when the payload has no pull request; a payload
    /// with a pull request but no repository is rejected.
    pub fn parse(json: &str) -> Result<Self> {
        let payload: EventPayload = serde_json::from_str(json)
            .map_err(|e| NewlineError::InvalidEvent(e.to_string()))?;

        let context = match payload.pull_request {
            Some(pr) => {
                let repository = payload.repository.ok_or_else(|| {
                    NewlineError::InvalidEvent("pull request event has no repository".to_string())
                })?;
                Some(PullRequestContext {
                    owner: repository.owner.login,
                    repo: repository.name,
                    pr_number: pr.number,
                    head_sha: pr.head.sha,
                    head_ref: pr.head.git_ref,
                })
            }
            None => None,
        };

        Ok(PullRequestEvent {
            action: payload.action,
            context,
        })
    }

    /// Read and parse the event payload file.
    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| NewlineError::io(path, e))?;
        Self::parse(&json)
    }
}

/// Whether an event should trigger a run.
pub fn should_handle(event_name: &str, action: Option<&str>) -> bool {
    event_name == PULL_REQUEST_EVENT
        && action.map(|a| HANDLED_ACTIONS.contains(&a)).unwrap_or(false)
}
