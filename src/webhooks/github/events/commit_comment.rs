use serde::Deserialize;
use url::Url;

use crate::webhooks::github::events::{GitHubUser, Repository};

#[derive(Debug, Deserialize)]
pub struct CommitCommentEvent {
    pub action: String,
    pub sender: GitHubUser,
    pub repository: Repository,
    pub comment: CommitComment,
}

#[derive(Debug, Deserialize)]
pub struct CommitComment {
    pub html_url: Url,
    pub body: String,
    pub commit_id: String,
}
