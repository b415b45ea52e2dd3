mod api;
mod cli;
mod core;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    api::heartbeat,
    cli::{Args, Command},
    prelude::*,
};

#[tokio::main]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let heartbeat = heartbeat::Client::new(args.heartbeat_url);
    match args.command {
        Command::Watch(args) => (*args).run(heartbeat).await?,
        Command::Fetch(args) => {
            (*args).run().await?;
            heartbeat.send().await;
        }
        Command::Validate(args) => (*args).run().await?,
    }

    info!("done!");
    Ok(())
}
