use clap::Parser;
use reqwest::Url;

use crate::{api::ecoguard, core::portal::Credentials, prelude::*};

#[derive(Parser)]
pub struct PortalArgs {
    /// Ecoguard Insight portal URL.
    #[clap(long = "base-url", env = "ECOGUARD_BASE_URL", default_value = "https://insight.ecoguard.se")]
    pub base_url: Url,

    #[clap(long = "rentable-object-number", env = "ECOGUARD_RENTABLE_OBJECT_NUMBER")]
    pub rentable_object_number: String,

    #[clap(long = "password", env = "ECOGUARD_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Housing association database name as shown in the portal.
    #[clap(long = "database-name", env = "ECOGUARD_DATABASE_NAME")]
    pub database_name: String,

    /// Upper bound on a single fetch.
    #[clap(long = "timeout", env = "ECOGUARD_TIMEOUT", default_value = "30s")]
    pub timeout: humantime::Duration,
}

impl PortalArgs {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            rentable_object_number: self.rentable_object_number.clone(),
            password: self.password.clone(),
            database_name: self.database_name.clone(),
        }
    }

    pub fn try_new_api(&self) -> Result<ecoguard::Api> {
        ecoguard::Api::try_new(self.base_url.clone(), *self.timeout)
    }
}
