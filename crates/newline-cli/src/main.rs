//! newline-fix - trailing line terminator remediation for pull requests
//!
//! Runs inside a pull request workflow: reads the webhook event, loads the
//! repository's optional `.github/newline.yml`, fixes changed text files that
//! do not end with a line break, commits the fixes to the PR branch (unless
//! `autoCommit: false`) and comments a report on the pull request.
//!
//! Every option can also be supplied through the environment variables the
//! workflow runner already exports (`GITHUB_TOKEN`, `GITHUB_WORKSPACE`,
//! `GITHUB_EVENT_PATH`, `GITHUB_EVENT_NAME`, `GITHUB_API_URL`).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use newline_core::context::PULL_REQUEST_EVENT;
use newline_core::{
    resolve_config_path, should_handle, Config, PullRequestEvent, DEFAULT_CONFIG_PATH,
};
use newline_github::{GitHubClient, GitHubConfig, RepoSlug, DEFAULT_API_URL};
use tracing::{error, info, Level};

#[derive(Parser, Debug)]
#[command(name = "newline-fix")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fix missing final line breaks in pull request files", long_about = None)]
struct Cli {
    /// Token used to call the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Config file path, relative to the workspace
    #[arg(long, env = "NEWLINE_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    config_path: PathBuf,

    /// Checked-out repository root
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// Webhook event payload file
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// Name of the triggering event
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

/// How a successful invocation ended.
#[derive(Debug, PartialEq, Eq)]
enum RunStatus {
    /// The event is not one this tool handles
    Skipped,
    Completed {
        fixed: usize,
        commit: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    newline_core::init_tracing(cli.json, level);

    match execute(&cli).await {
        Ok(RunStatus::Skipped) => ExitCode::SUCCESS,
        Ok(RunStatus::Completed { fixed, commit }) => {
            info!(fixed, commit = ?commit, "Done.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let message = format!("{err:#}");
            error!(error = %message, "newline-fix failed");
            println!("::error::{}", escape_workflow_data(&message));
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: &Cli) -> Result<RunStatus> {
    if cli.event_name != PULL_REQUEST_EVENT {
        info!("This action is supposed to run for pushes to pull requests only. Skipping...");
        return Ok(RunStatus::Skipped);
    }

    let event = PullRequestEvent::read(&cli.event_path).context("Failed to read event payload")?;
    if !should_handle(&cli.event_name, event.action.as_deref()) {
        info!("This action is supposed to run for pushes to pull requests only. Skipping...");
        return Ok(RunStatus::Skipped);
    }
    let pr = event
        .context
        .ok_or_else(|| anyhow!("pull_request event carries no pull request"))?;

    let config_file = resolve_config_path(&cli.workspace, &cli.config_path);
    let (config, _) = Config::load_or_default(&config_file);

    let client = GitHubClient::new(
        GitHubConfig::new(&cli.github_token).with_api_url(&cli.api_url),
        RepoSlug::new(&pr.owner, &pr.repo),
    )
    .context("Failed to create GitHub client")?;

    let outcome = newline_core::run(&client, &config, &pr, &cli.workspace)
        .await
        .with_context(|| format!("Failed to remediate {}#{}", client.repo(), pr.pr_number))?;

    Ok(RunStatus::Completed {
        fixed: outcome.fixes.len(),
        commit: outcome.commit.map(|c| c.commit_sha),
    })
}

/// Escape a message for a `::error::` workflow command.
fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
