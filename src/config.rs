use std::{
    env,
    net::{IpAddr, SocketAddr},
};

use anyhow::{ensure, Context};
use serde::Deserialize;
use url::Url;

const WEBHOOK_SECRET: &str = "WEBHOOK_SECRET";
const HOST: &str = "HOST";
const DEFAULT_PORT: u16 = 8888;

#[derive(Debug, Deserialize)]
pub struct DingobotConfig {
    /// Secret shared with GitHub, used to sign webhook payloads. Falls back to the
    /// `WEBHOOK_SECRET` environment variable when missing.
    #[serde(default)]
    pub github_secret: Option<String>,
    /// Address the HTTP server binds to. Falls back to the `HOST` environment variable, then to
    /// all interfaces.
    #[serde(default)]
    pub address: Option<IpAddr>,
    /// Port the HTTP server listens on. Falls back to the `HOST` environment variable, then to
    /// 8888.
    #[serde(default)]
    pub port: Option<u16>,
    /// DingTalk robot endpoint messages are posted to. The `access_token` query parameter is
    /// appended per request.
    #[serde(default = "default_dingtalk_api")]
    pub dingtalk_api: Url,
}

impl DingobotConfig {
    /// Resolves the webhook secret, from the config file first then from the environment.
    ///
    /// An empty or missing secret is a fatal error: without it no payload could ever be verified.
    pub fn github_secret(&self) -> anyhow::Result<String> {
        let secret = match &self.github_secret {
            Some(secret) => secret.clone(),
            None => env::var(WEBHOOK_SECRET).with_context(|| {
                format!("no github_secret in config and {} is unset", WEBHOOK_SECRET)
            })?,
        };

        ensure!(!secret.is_empty(), "the GitHub webhook secret can't be empty");

        Ok(secret)
    }

    /// Resolves where the server listens: config keys first, then `HOST` (`[address]:port`).
    pub fn listen_address(&self) -> anyhow::Result<SocketAddr> {
        if let (Some(address), Some(port)) = (self.address, self.port) {
            return Ok(SocketAddr::new(address, port));
        }

        let from_env = match env::var(HOST) {
            Ok(host) if !host.is_empty() => Some(parse_host(&host)?),
            _ => None,
        };

        let address = self
            .address
            .or_else(|| from_env.and_then(|(address, _)| address))
            .unwrap_or_else(default_address);
        let port = self
            .port
            .or_else(|| from_env.map(|(_, port)| port))
            .unwrap_or(DEFAULT_PORT);

        Ok(SocketAddr::new(address, port))
    }
}

/// Parses a `HOST` value such as `:8888` or `127.0.0.1:8888`, an empty address meaning all
/// interfaces.
fn parse_host(host: &str) -> anyhow::Result<(Option<IpAddr>, u16)> {
    let (address, port) = host
        .rsplit_once(':')
        .with_context(|| format!("{} `{}` should look like `[address]:port`", HOST, host))?;

    let port = port
        .parse()
        .with_context(|| format!("invalid port in {} `{}`", HOST, host))?;

    let address = address.trim_start_matches('[').trim_end_matches(']');
    if address.is_empty() {
        return Ok((None, port));
    }

    let address = address
        .parse()
        .with_context(|| format!("invalid address in {} `{}`", HOST, host))?;

    Ok((Some(address), port))
}

fn default_address() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_dingtalk_api() -> Url {
    Url::parse("https://oapi.dingtalk.com/robot/send").expect("default DingTalk URL is valid")
}
