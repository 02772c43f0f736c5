//! newline-fix core library
//!
//! Remediates pull requests whose changed text files do not end with a line
//! terminator. The pipeline enumerates the changed files, filters out ignored
//! and binary ones, appends the terminator style each file already uses,
//! optionally folds every fix into a single commit on the PR branch, and
//! posts a markdown report.

pub mod commit;
pub mod config;
pub mod context;
pub mod enumerate;
pub mod error;
pub mod filter;
pub mod fixer;
pub mod obs;
pub mod pipeline;
pub mod report;
pub mod telemetry;

pub use commit::{bot_identity, commit_fixes, CommitOutcome, COMMIT_MESSAGE};
pub use config::{
    compile_ignore_set, resolve_config_path, Config, ConfigOverrides, ConfigSource,
    DEFAULT_CONFIG_PATH, DEFAULT_IGNORE_PATHS,
};
pub use context::{should_handle, PullRequestContext, PullRequestEvent};
pub use enumerate::list_changed_files;
pub use error::{ConfigError, NewlineError, Result};
pub use filter::{classify_text, Eligibility, PathFilter, SkipReason};
pub use fixer::{
    ends_with_terminator, fix_content, fix_file, infer_terminator, FixResult, Terminator,
};
pub use pipeline::{fix_changed_files, run, RunOutcome};
pub use report::render_report_md;
pub use telemetry::init_tracing;
