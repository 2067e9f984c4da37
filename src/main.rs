use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

mod bot;
use bot::DingTalk;

mod config;
use config::DingobotConfig;

mod webhooks;
use webhooks::{Dispatcher, GitHubSecret};

#[derive(Parser)]
#[clap(version)]
struct Opts {
    /// Configuration file for dingobot
    #[clap(short, long, env = "DINGOBOT_CONFIG")]
    config: PathBuf,
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    let config_file = File::open(&opts.config)
        .with_context(|| format!("couldn't open {}:", opts.config.display()))?;
    let config: DingobotConfig = serde_yaml::from_reader(BufReader::new(config_file))
        .context("couldn't parse config file")?;

    let github_secret = config
        .github_secret()
        .context("couldn't find the GitHub webhook secret")?;
    let dingtalk =
        DingTalk::new(config.dingtalk_api.clone()).context("failed to create DingTalk client")?;

    let listen = config
        .listen_address()
        .context("couldn't resolve the listening address")?;
    let figment = rocket::Config::figment()
        .merge(("address", listen.ip()))
        .merge(("port", listen.port()));

    info!("listening on {}", listen);
    let rocket = webhooks::server(
        figment,
        GitHubSecret(github_secret),
        Dispatcher(Box::new(dingtalk)),
    );
    rocket
        .launch()
        .await
        .map(|_| ())
        .map_err(|err| anyhow::anyhow!("{}", err))
}
