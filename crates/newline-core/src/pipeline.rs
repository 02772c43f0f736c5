//! End-to-end remediation run for one pull request.
//!
//! Strictly sequential: enumerate once, then filter and fix each file in
//! arrival order, then commit (if enabled) and comment. The first fatal
//! error ends the run.

use std::path::Path;

use newline_github::RepositoryClient;
use tracing::{info, Instrument};

use crate::commit::{commit_fixes, CommitOutcome};
use crate::config::Config;
use crate::context::PullRequestContext;
use crate::enumerate::list_changed_files;
use crate::error::Result;
use crate::filter::{Eligibility, PathFilter, SkipReason};
use crate::fixer::{fix_file, FixResult};
use crate::obs;
use crate::report::render_report_md;

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Fixed files, in arrival order
    pub fixes: Vec<FixResult>,
    /// Markdown posted on the pull request
    pub report: String,
    /// The fix commit, when one was created
    pub commit: Option<CommitOutcome>,
}

impl RunOutcome {
    pub fn fixed_paths(&self) -> Vec<&str> {
        self.fixes.iter().map(|f| f.path.as_str()).collect()
    }
}

/// Filter and fix changed files in the working copy at `repo_root`.
pub async fn fix_changed_files(
    client: &dyn RepositoryClient,
    config: &Config,
    pr: &PullRequestContext,
    repo_root: &Path,
) -> Result<Vec<FixResult>> {
    let changed = list_changed_files(client, pr).await?;

    info!("Locating files...");
    let ignore = config.ignore_set()?;
    let filter = PathFilter::scan(repo_root, &ignore)?;

    let mut fixes = Vec::new();
    for record in &changed {
        let content = match filter.check(&record.filename).await? {
            Eligibility::Eligible(content) => content,
            Eligibility::Skip(reason) => {
                obs::emit_file_skipped(&record.filename, reason);
                continue;
            }
        };
        match fix_file(repo_root, &record.filename, &content).await? {
            Some(fix) => {
                obs::emit_file_fixed(&fix.path, fix.terminator);
                fixes.push(fix);
            }
            None => obs::emit_file_skipped(&record.filename, SkipReason::AlreadyTerminated),
        }
    }
    Ok(fixes)
}

/// Run the whole pipeline for one pull request.
pub async fn run(
    client: &dyn RepositoryClient,
    config: &Config,
    pr: &PullRequestContext,
    repo_root: &Path,
) -> Result<RunOutcome> {
    let span = obs::run_span(&format!("{}/{}", pr.owner, pr.repo), pr.pr_number);
    run_inner(client, config, pr, repo_root)
        .instrument(span)
        .await
}

async fn run_inner(
    client: &dyn RepositoryClient,
    config: &Config,
    pr: &PullRequestContext,
    repo_root: &Path,
) -> Result<RunOutcome> {
    obs::emit_run_started(&pr.head_ref, &pr.head_sha, config.auto_commit);

    let fixes = fix_changed_files(client, config, pr, repo_root).await?;
    if fixes.is_empty() {
        info!("No compromised files found.");
    }

    info!("Generating markdown report...");
    let report = render_report_md(&fixes, config.auto_commit);

    let commit = if !config.auto_commit {
        info!("Auto commit is disabled. Skipping...");
        None
    } else if fixes.is_empty() {
        info!("Nothing to commit. Skipping...");
        None
    } else {
        Some(commit_fixes(client, pr, &fixes).await?)
    };

    info!("Leaving comment on PR...");
    let comment_id = client.create_issue_comment(pr.pr_number, &report).await?;
    obs::emit_comment_posted(comment_id, fixes.len());

    Ok(RunOutcome {
        fixes,
        report,
        commit,
    })
}
