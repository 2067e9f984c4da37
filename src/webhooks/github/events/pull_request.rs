use serde::Deserialize;

use crate::webhooks::github::events::{GitHubUser, PullRequest, Repository, Team};

#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    pub number: u64,
    pub repository: Repository,
    pub sender: GitHubUser,
    pub pull_request: PullRequest,
    pub action: String,
    // only sent with `review_requested` / `review_request_removed`, and then only one of the two
    pub requested_reviewer: Option<GitHubUser>,
    pub requested_team: Option<Team>,
}
