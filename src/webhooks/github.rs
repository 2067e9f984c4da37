use rocket::{
    request::{FromRequest, Outcome},
    Request, State,
};
use tracing::{debug, info, trace};

use crate::{
    bot::handle_github_event,
    webhooks::{Dispatcher, WebhookError},
};

pub mod events;
pub use events::GitHubEvent;

mod signing;
use signing::SignedGitHubPayload;

const X_GITHUB_EVENT: &str = "X-GitHub-Event";
const ACCESS_TOKEN: &str = "access_token";

pub struct GitHubSecret(pub String);

#[rocket::post("/github", data = "<payload>")]
pub async fn github_webhook(
    token: AccessToken,
    event: GitHubEventType,
    payload: SignedGitHubPayload,
    dispatcher: &State<Dispatcher>,
) -> Result<(), WebhookError> {
    info!("received event {:?}", event);
    trace!("signed payload:\n{}", payload.json);

    let token = match token.0.or(payload.access_token) {
        Some(token) => token,
        None => {
            trace!("no {} in query nor form, stopping here...", ACCESS_TOKEN);
            return Err(WebhookError::MissingAccessToken);
        }
    };

    let event = GitHubEvent::from_payload(event, &payload.json)?;
    let notification = match handle_github_event(event) {
        Some(notification) => notification,
        None => {
            debug!("event didn't need to be announced");
            return Ok(());
        }
    };

    trace!("dispatching `{}`", notification.title);
    dispatcher
        .0
        .send(&notification, &token)
        .await
        .map_err(WebhookError::Dispatch)
}

/// Credential for the outbound chat API, passed in the hook's URL.
///
/// Form-encoded deliveries may carry it in their body instead, it is then only known once the
/// payload is read.
pub struct AccessToken(Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AccessToken {
    type Error = WebhookError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match request.query_value::<String>(ACCESS_TOKEN) {
            Some(Ok(token)) if !token.is_empty() => Outcome::Success(AccessToken(Some(token))),
            _ if request.content_type().map_or(false, |ct| ct.is_form()) => {
                trace!("no {} in query, looking in the form body", ACCESS_TOKEN);
                Outcome::Success(AccessToken(None))
            }
            _ => {
                trace!("no {} in query, stopping here...", ACCESS_TOKEN);
                WebhookError::MissingAccessToken.outcome()
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GitHubEventType {
    CommitComment,
    IssueComment,
    PullRequest,
    PullRequestReview,
    PullRequestReviewComment,
    Push,
    Unrecognized(String),
}

impl From<&str> for GitHubEventType {
    fn from(event_type: &str) -> Self {
        match event_type {
            "commit_comment" => Self::CommitComment,
            "issue_comment" => Self::IssueComment,
            "pull_request" => Self::PullRequest,
            "pull_request_review" => Self::PullRequestReview,
            "pull_request_review_comment" => Self::PullRequestReviewComment,
            "push" => Self::Push,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for GitHubEventType {
    type Error = WebhookError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let event_types = request.headers().get(X_GITHUB_EVENT).collect::<Vec<_>>();
        if event_types.len() != 1 {
            trace!("couldn't locate {} header", X_GITHUB_EVENT);
            return WebhookError::MissingEventType.outcome();
        }

        Outcome::Success(GitHubEventType::from(event_types[0]))
    }
}
