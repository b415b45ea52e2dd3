mod fetch;
mod home_assistant;
mod portal;
mod validate;
mod watch;

use clap::{Parser, Subcommand};
use reqwest::Url;

use crate::cli::{fetch::FetchArgs, validate::ValidateArgs, watch::WatchArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// URL to ping after every successful cycle.
    #[clap(long = "heartbeat-url", env = "HEARTBEAT_URL", global = true)]
    pub heartbeat_url: Option<Url>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: periodically fetch the readings and publish them to Home Assistant.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Fetch the readings once and print them.
    #[clap(name = "fetch")]
    Fetch(Box<FetchArgs>),

    /// Log in to the portal and check the credentials.
    #[clap(name = "validate")]
    Validate(Box<ValidateArgs>),
}
