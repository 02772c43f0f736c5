//! Structured observability hooks for remediation runs.
//!
//! This module provides:
//! - A run-scoped tracing span via [`run_span`]
//! - Emission functions for the key pipeline events
//!
//! Events are emitted at `info!` level; set `RUST_LOG` to filter them.

use tracing::{info, Span};

use crate::filter::SkipReason;
use crate::fixer::Terminator;

/// Run-scoped span tagged with the repository and PR number.
///
/// # Example
///
/// ```ignore
/// async { /* ... */ }.instrument(run_span("octo/widgets", 12)).await;
/// // every log line now carries repo = "octo/widgets" and pr = 12
/// ```
pub fn run_span(repo: &str, pr_number: u64) -> Span {
    tracing::info_span!("newline.run", repo = %repo, pr = pr_number)
}

/// Emit event: run started for a pull request head.
pub fn emit_run_started(head_ref: &str, head_sha: &str, auto_commit: bool) {
    info!(
        event = "run.started",
        head_ref = %head_ref,
        head_sha = %head_sha,
        auto_commit = auto_commit,
    );
}

/// Emit event: one page of changed files fetched.
pub fn emit_page_fetched(page: u32, count: usize) {
    info!(event = "files.page_fetched", page = page, count = count, "Page {}:", page);
}

/// Emit event: a changed file was skipped.
pub fn emit_file_skipped(path: &str, reason: SkipReason) {
    info!(event = "file.skipped", path = %path, reason = %reason, "{} is {}. Skipping...", path, reason);
}

/// Emit event: a changed file was fixed.
pub fn emit_file_fixed(path: &str, terminator: Terminator) {
    info!(event = "file.fixed", path = %path, terminator = %terminator, "{} is compromised. Fixed.", path);
}

/// Emit event: the fix commit was created and the branch moved to it.
pub fn emit_commit_created(sha: &str, branch: &str, files: usize) {
    info!(event = "commit.created", sha = %sha, branch = %branch, files = files);
}

/// Emit event: the report comment was posted.
pub fn emit_comment_posted(comment_id: u64, fixed: usize) {
    info!(event = "comment.posted", comment_id = comment_id, fixed = fixed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_create() {
        let span = run_span("octo/widgets", 1);
        let _entered = span.enter();
        emit_page_fetched(1, 0);
    }
}
