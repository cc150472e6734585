use crate::cli::{non_empty_path, non_empty_str, CheckArgs};
use crate::commands::ReportInputs;
use anyhow::{Context, Result};
use plarix::error::AppError;
use plarix::github::{read_pr_number, CommentAction, GithubClient};
use plarix::signals::extract_signals;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Execute the check command
///
/// Reads the pull request diff from GitHub, writes the report to the job
/// summary (or stdout) and keeps a single PR comment up to date.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let inputs = ReportInputs::load(&args.inputs)?;

    let token = non_empty_str(&args.github_token).ok_or_else(|| {
        AppError::Config("GITHUB_TOKEN is empty; required to read PR diffs".to_string())
    })?;
    let event_path = non_empty_path(&args.event_path)
        .ok_or_else(|| AppError::Config("GITHUB_EVENT_PATH is empty".to_string()))?;
    let repo = non_empty_str(&args.repo)
        .ok_or_else(|| AppError::Config("GITHUB_REPOSITORY is empty".to_string()))?;
    let pr_number = read_pr_number(event_path).context("Cannot read PR number")?;

    info!("Checking {}#{}", repo, pr_number);

    let client = GithubClient::new(token, &args.api_url);
    let files = client
        .fetch_pr_files(repo, pr_number)
        .await
        .context("Failed to fetch PR files")?;
    let signals = extract_signals(&files);
    let report = inputs.render(&signals);

    match non_empty_path(&args.step_summary) {
        Some(path) => append_summary(path, &report)?,
        None => println!("{}", report),
    }

    if args.no_comment {
        info!("Skipping PR comment (--no-comment)");
        return Ok(());
    }

    match client.upsert_comment(repo, pr_number, &report).await {
        Ok(CommentAction::Created) => info!("Posted cost report comment"),
        Ok(CommentAction::Updated(id)) => info!("Refreshed cost report comment {}", id),
        Err(e) => warn!("Failed to update PR comment: {}", e),
    }

    Ok(())
}

/// Append to the job summary; other steps may have written to it already
fn append_summary(path: &Path, report: &str) -> Result<(), AppError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::io(path, e))?;
    writeln!(file, "{}", report).map_err(|e| AppError::io(path, e))?;
    info!("Report written to {}", path.display());
    Ok(())
}
