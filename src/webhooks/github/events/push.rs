use serde::Deserialize;
use url::Url;

use crate::webhooks::github::events::{Repository, REF_BRANCH_PREFIX, REF_TAG_PREFIX};

#[derive(Debug, Deserialize)]
pub struct PushEvent {
    pub repository: Repository,
    pub pusher: Committer,
    pub commits: Vec<Commit>,
    pub forced: bool,
    pub created: bool,
    pub deleted: bool,
    pub r#ref: String,
    pub compare: Url,
}

impl PushEvent {
    /// Splits the pushed ref into its kind (`branch` or `tag`) and short name.
    ///
    /// Refs outside of `refs/heads/` and `refs/tags/` have no kind and an empty name.
    pub fn ref_kind_and_name(&self) -> (&'static str, &str) {
        if let Some(name) = self.r#ref.strip_prefix(REF_BRANCH_PREFIX) {
            ("branch", name)
        } else if let Some(name) = self.r#ref.strip_prefix(REF_TAG_PREFIX) {
            ("tag", name)
        } else {
            ("", "")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Commit {
    pub id: String,
    pub url: Url,
    pub message: String,
    pub committer: Committer,
}

/// Git identity, as found in `pusher` and in each commit's `author` / `committer`
#[derive(Debug, Deserialize)]
pub struct Committer {
    pub name: String,
}
