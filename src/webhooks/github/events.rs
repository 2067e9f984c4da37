use serde::Deserialize;
use url::Url;

use crate::webhooks::github::GitHubEventType;

mod commit_comment;
mod issue_comment;
mod pull_request;
mod pull_request_review;
mod pull_request_review_comment;
mod push;

pub use commit_comment::*;
pub use issue_comment::*;
pub use pull_request::*;
pub use pull_request_review::*;
pub use pull_request_review_comment::*;
pub use push::*;

pub const REF_BRANCH_PREFIX: &str = "refs/heads/";
pub const REF_TAG_PREFIX: &str = "refs/tags/";

#[derive(Debug)]
pub enum GitHubEvent {
    CommitComment(CommitCommentEvent),
    IssueComment(IssueCommentEvent),
    PullRequest(PullRequestEvent),
    PullRequestReview(PullRequestReviewEvent),
    PullRequestReviewComment(PullRequestReviewCommentEvent),
    Push(PushEvent),
    /// Any event type we don't announce, its payload is never decoded
    Unrecognized(String),
}

impl GitHubEvent {
    /// Decodes a verified payload according to the type announced in the `X-GitHub-Event`
    /// header.
    pub fn from_payload(event_type: GitHubEventType, payload: &str) -> serde_json::Result<Self> {
        let event = match event_type {
            GitHubEventType::CommitComment => Self::CommitComment(serde_json::from_str(payload)?),
            GitHubEventType::IssueComment => Self::IssueComment(serde_json::from_str(payload)?),
            GitHubEventType::PullRequest => Self::PullRequest(serde_json::from_str(payload)?),
            GitHubEventType::PullRequestReview => {
                Self::PullRequestReview(serde_json::from_str(payload)?)
            }
            GitHubEventType::PullRequestReviewComment => {
                Self::PullRequestReviewComment(serde_json::from_str(payload)?)
            }
            GitHubEventType::Push => Self::Push(serde_json::from_str(payload)?),
            GitHubEventType::Unrecognized(name) => Self::Unrecognized(name),
        };

        Ok(event)
    }
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub struct Comment {
    pub html_url: Url,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: Url,
    pub title: String,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Team {
    pub name: String,
}
