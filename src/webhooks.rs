use rocket::{
    figment::Provider,
    http::Status,
    outcome::Outcome,
    response::{self, Responder},
    routes, Build, Request, Rocket,
};
use thiserror::Error;
use tracing::warn;

use crate::bot::Dispatch;

pub mod github;
pub use github::{github_webhook, GitHubSecret};

/// Outbound side of the bridge, shared by every request
pub struct Dispatcher(pub Box<dyn Dispatch>);

/// Builds the webhook server. Nothing but the secret and the dispatcher is shared between
/// requests.
pub fn server<T: Provider>(
    config: T,
    secret: GitHubSecret,
    dispatcher: Dispatcher,
) -> Rocket<Build> {
    rocket::custom(config)
        .mount("/", routes![github_webhook])
        .manage(secret)
        .manage(dispatcher)
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("request has no access_token")]
    MissingAccessToken,
    #[error("request header needs exactly one event type")]
    MissingEventType,
    #[error("couldn't authenticate payload: {0}")]
    Authentication(&'static str),
    #[error("couldn't decode payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("couldn't dispatch message: {0:#}")]
    Dispatch(anyhow::Error),
}

impl WebhookError {
    pub fn status(&self) -> Status {
        match self {
            Self::MissingAccessToken => Status::Forbidden,
            Self::MissingEventType | Self::Authentication(_) | Self::Decode(_) => {
                Status::InternalServerError
            }
            Self::Dispatch(_) => Status::BadRequest,
        }
    }

    /// Fails a request or data guard with the status matching this error.
    pub(crate) fn outcome<S, F>(self) -> Outcome<S, (Status, Self), F> {
        Outcome::Error((self.status(), self))
    }
}

impl<'r> Responder<'r, 'static> for WebhookError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        warn!("failed to handle webhook: {}", self);
        Err(self.status())
    }
}
