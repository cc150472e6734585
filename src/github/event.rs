use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PullRequestEvent {
    #[serde(default)]
    pull_request: Option<PullRequestRef>,
}

#[derive(Debug, Deserialize)]
struct PullRequestRef {
    #[serde(default)]
    number: u64,
}

/// Read `pull_request.number` from the Actions event payload
pub fn read_pr_number(event_path: &Path) -> Result<u64, AppError> {
    let raw = std::fs::read_to_string(event_path).map_err(|e| AppError::io(event_path, e))?;
    parse_pr_number(&raw)
}

fn parse_pr_number(raw: &str) -> Result<u64, AppError> {
    let event: PullRequestEvent = serde_json::from_str(raw)?;
    match event.pull_request.map(|pr| pr.number) {
        Some(number) if number > 0 => Ok(number),
        _ => Err(AppError::Event(
            "pull_request.number missing (is this a pull_request event?)".to_string(),
        )),
    }
}
