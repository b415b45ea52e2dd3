use clap::Parser;
use reqwest::Url;

use crate::{api::home_assistant, prelude::*};

#[derive(Parser)]
pub struct HomeAssistantArgs {
    #[clap(
        long = "home-assistant-access-token",
        env = "HOME_ASSISTANT_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub access_token: String,

    /// Home Assistant API base URL. For example: `http://localhost:8123/api`.
    #[clap(long = "home-assistant-api-base-url", env = "HOME_ASSISTANT_API_BASE_URL")]
    pub base_url: Url,

    /// Published sensors are named `sensor.{prefix}_{reading}`.
    #[clap(long = "entity-prefix", env = "ENTITY_PREFIX", default_value = "ecoguard")]
    pub entity_prefix: String,
}

impl HomeAssistantArgs {
    pub fn try_new_client(&self, device: String) -> Result<home_assistant::Api> {
        home_assistant::Api::try_new(
            &self.access_token,
            self.base_url.clone(),
            self.entity_prefix.clone(),
            device,
        )
    }
}
