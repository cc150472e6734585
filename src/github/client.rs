use crate::error::AppError;
use crate::github::{IssueComment, PrFile};
use crate::report::COMMENT_MARKER;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = "plarix-action";
const ACCEPT: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const PER_PAGE: usize = 100;
const MAX_PAGES: usize = 10;

/// What `upsert_comment` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Created,
    Updated(u64),
}

/// Minimal GitHub REST client
pub struct GithubClient {
    client: Client,
    token: String,
    api_base: String,
}

impl GithubClient {
    pub fn new(token: impl Into<String>, api_base: &str) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
    }

    /// Changed files of a pull request, following pagination up to 10 pages of 100
    pub async fn fetch_pr_files(&self, repo: &str, pr_number: u64) -> Result<Vec<PrFile>, AppError> {
        validate_repo(repo)?;
        let url = format!("{}/repos/{}/pulls/{}/files", self.api_base, repo, pr_number);
        let mut files = Vec::new();

        for page in 1..=MAX_PAGES {
            let response = self
                .authorized(self.client.get(&url))
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await?;
            let batch: Vec<PrFile> = check_status(response).await?.json().await?;
            let count = batch.len();
            debug!(page, count, "Fetched PR files page");
            files.extend(batch);

            if count < PER_PAGE {
                break;
            }
        }

        info!("Fetched {} changed files for {}#{}", files.len(), repo, pr_number);
        Ok(files)
    }

    /// Update the comment carrying the report marker, or create one
    pub async fn upsert_comment(
        &self,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<CommentAction, AppError> {
        validate_repo(repo)?;

        match self.find_marker_comment(repo, pr_number).await? {
            Some(id) => {
                let url = format!("{}/repos/{}/issues/comments/{}", self.api_base, repo, id);
                let response = self
                    .authorized(self.client.patch(&url))
                    .json(&json!({ "body": body }))
                    .send()
                    .await?;
                check_status(response).await?;
                info!("Updated PR comment {}", id);
                Ok(CommentAction::Updated(id))
            }
            None => {
                let url = format!(
                    "{}/repos/{}/issues/{}/comments",
                    self.api_base, repo, pr_number
                );
                let response = self
                    .authorized(self.client.post(&url))
                    .json(&json!({ "body": body }))
                    .send()
                    .await?;
                check_status(response).await?;
                info!("Created PR comment on {}#{}", repo, pr_number);
                Ok(CommentAction::Created)
            }
        }
    }

    async fn find_marker_comment(&self, repo: &str, pr_number: u64) -> Result<Option<u64>, AppError> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_base, repo, pr_number
        );
        let response = self
            .authorized(self.client.get(&url))
            .query(&[("per_page", PER_PAGE)])
            .send()
            .await?;
        let comments: Vec<IssueComment> = check_status(response).await?.json().await?;

        Ok(comments
            .into_iter()
            .find(|c| c.body.as_deref().is_some_and(|b| b.contains(COMMENT_MARKER)))
            .map(|c| c.id))
    }
}

async fn check_status(response: Response) -> Result<Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(AppError::Github { status, message })
}

fn validate_repo(repo: &str) -> Result<(), AppError> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok(()),
        _ => Err(AppError::Config(format!(
            "invalid repository '{}', expected owner/name",
            repo
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_repo() {
        assert!(validate_repo("octo/app").is_ok());
        assert!(validate_repo("octo").is_err());
        assert!(validate_repo("/app").is_err());
        assert!(validate_repo("octo/").is_err());
    }

    #[test]
    fn test_api_base_trailing_slash() {
        let client = GithubClient::new("t", "https://ghe.example.com/api/v3/");
        assert_eq!(client.api_base, "https://ghe.example.com/api/v3");
    }
}
