use async_trait::async_trait;
use clap::Parser;

use crate::{
    cli::portal::PortalArgs,
    core::{
        cycle::{Cycle, Publisher},
        reading::ReadingSet,
    },
    prelude::*,
    tables::build_readings_table,
};

#[derive(Parser)]
pub struct FetchArgs {
    #[clap(flatten)]
    portal: PortalArgs,

    /// Print JSON instead of a table.
    #[clap(long)]
    json: bool,
}

impl FetchArgs {
    pub async fn run(self) -> Result {
        let mut cycle = Cycle::builder()
            .portal(self.portal.try_new_api()?)
            .publisher(Stdout { json: self.json })
            .timeout(*self.portal.timeout)
            .build();
        cycle.run(&self.portal.credentials()).await?;
        Ok(())
    }
}

struct Stdout {
    json: bool,
}

#[async_trait]
impl Publisher for Stdout {
    async fn publish(&self, readings: &ReadingSet) -> Result {
        if self.json {
            println!("{}", serde_json::to_string_pretty(readings)?);
        } else {
            println!("{}", build_readings_table(readings));
        }
        Ok(())
    }
}
