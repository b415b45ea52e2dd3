use clap::Parser;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    api::heartbeat,
    cli::{home_assistant::HomeAssistantArgs, portal::PortalArgs},
    core::cycle::Cycle,
    prelude::*,
};

#[derive(Parser)]
pub struct WatchArgs {
    /// How often the readings get refreshed.
    #[clap(long = "interval", env = "ECOGUARD_INTERVAL", default_value = "1h")]
    interval: humantime::Duration,

    #[clap(flatten)]
    portal: PortalArgs,

    #[clap(flatten)]
    home_assistant: HomeAssistantArgs,
}

impl WatchArgs {
    pub async fn run(self, heartbeat: heartbeat::Client) -> Result {
        let credentials = self.portal.credentials();
        let mut cycle = Cycle::builder()
            .portal(self.portal.try_new_api()?)
            .publisher(self.home_assistant.try_new_client(credentials.account_id())?)
            .timeout(*self.portal.timeout)
            .build();

        let mut interval = interval(*self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval = %self.interval, "watching…");

        loop {
            interval.tick().await;
            // Failures are already logged, the previous readings stay published until the next tick.
            if cycle.run(&credentials).await.is_ok() {
                heartbeat.send().await;
            } else if cycle.last_readings().is_none() {
                warn!("nothing has been published yet");
            }
        }
    }
}
