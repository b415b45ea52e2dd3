use clap::Parser;

use crate::{cli::portal::PortalArgs, prelude::*};

#[derive(Parser)]
pub struct ValidateArgs {
    #[clap(flatten)]
    portal: PortalArgs,
}

impl ValidateArgs {
    pub async fn run(self) -> Result {
        self.portal
            .try_new_api()?
            .validate(&self.portal.credentials())
            .await
            .context("the credentials do not work")?;
        info!("the credentials are valid");
        Ok(())
    }
}
