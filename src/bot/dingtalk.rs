use std::time::Duration;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::bot::message_builder::Notification;

const TIMEOUT: Duration = Duration::from_secs(10);

/// Something able to deliver a [`Notification`] to the chat, on behalf of the owner of `token`.
#[rocket::async_trait]
pub trait Dispatch: Send + Sync {
    async fn send(&self, notification: &Notification, token: &str) -> anyhow::Result<()>;
}

/// Client for DingTalk's custom robot API.
pub struct DingTalk {
    client: reqwest::Client,
    api: Url,
}

impl DingTalk {
    pub fn new(api: Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .context("couldn't build HTTP client")?;

        Ok(Self { client, api })
    }

    fn endpoint(&self, token: &str) -> Url {
        let mut url = self.api.clone();
        url.query_pairs_mut().append_pair("access_token", token);
        url
    }
}

#[rocket::async_trait]
impl Dispatch for DingTalk {
    async fn send(&self, notification: &Notification, token: &str) -> anyhow::Result<()> {
        let message = Message::markdown(notification);
        trace!("posting to DingTalk: {:?}", message);

        let response = self
            .client
            .post(self.endpoint(token))
            .json(&message)
            .send()
            .await
            .context("couldn't reach DingTalk")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("DingTalk returned {}: {}", status, body);
        }

        let response: SendResponse = response
            .json()
            .await
            .context("couldn't decode DingTalk response")?;
        response.check()?;

        debug!("sent `{}` to DingTalk", notification.brief);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
enum Message<'a> {
    Markdown { markdown: Markdown<'a>, at: At },
}

impl<'a> Message<'a> {
    /// Markdown message that doesn't mention anyone
    fn markdown(notification: &'a Notification) -> Self {
        Message::Markdown {
            markdown: Markdown {
                title: &notification.brief,
                text: notification.render(),
            },
            at: At::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Markdown<'a> {
    title: &'a str,
    text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct At {
    at_mobiles: Vec<String>,
    is_at_all: bool,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

impl SendResponse {
    fn check(&self) -> anyhow::Result<()> {
        if self.errcode != 0 {
            bail!("DingTalk returned errcode {}: {}", self.errcode, self.errmsg);
        }

        Ok(())
    }
}
