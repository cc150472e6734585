//! GitHub collaborator: pull request files, the PR comment, and the Actions event payload.

pub mod client;
pub mod event;

pub use client::{CommentAction, GithubClient, DEFAULT_API_URL};
pub use event::read_pr_number;

use serde::{Deserialize, Serialize};

/// One changed file of a pull request. `patch` is absent for binary or oversized files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrFile {
    pub filename: String,
    #[serde(default)]
    pub patch: Option<String>,
}

/// An issue comment on the pull request
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
}
