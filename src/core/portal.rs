use std::fmt::{Debug, Formatter};

use async_trait::async_trait;

use crate::core::records::Fetched;

/// Portal account credentials.
#[must_use]
#[derive(Clone)]
pub struct Credentials {
    pub rentable_object_number: String,
    pub password: String,
    pub database_name: String,
}

impl Credentials {
    /// Identity of the account, shared by all its readings.
    #[must_use]
    pub fn account_id(&self) -> String {
        format!("{}_{}", self.database_name, self.rentable_object_number)
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("rentable_object_number", &self.rentable_object_number)
            .field("password", &"***")
            .field("database_name", &self.database_name)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("authentication failed, check the credentials")]
    AuthenticationFailed,

    #[error("the portal is unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("unexpected response from the portal: {0}")]
    UnexpectedResponseShape(String),

    #[error("timed out")]
    Timeout,
}

impl FetchError {
    /// Transient failures are expected to go away by the next cycle.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkUnavailable(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout;
        }
        if error.is_decode() {
            return Self::UnexpectedResponseShape(format!("{error:#}"));
        }
        match error.status() {
            Some(status) if status.as_u16() == 401 || status.as_u16() == 403 => {
                Self::AuthenticationFailed
            }
            Some(status) if status.is_client_error() => {
                Self::UnexpectedResponseShape(format!("{error:#}"))
            }
            _ => Self::NetworkUnavailable(format!("{error:#}")),
        }
    }
}

/// Source of the raw account data.
#[async_trait]
pub trait Portal: Sync {
    /// Fetch the consumption history, the current month breakdown, and the current price.
    ///
    /// Either all three datasets are returned, or the whole fetch fails.
    async fn fetch(&self, credentials: &Credentials) -> Result<Fetched, FetchError>;
}
