use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::{
    core::{
        mapper::map,
        portal::{Credentials, FetchError, Portal},
        reading::ReadingSet,
    },
    prelude::*,
};

/// Destination of the freshly mapped readings.
#[async_trait]
pub trait Publisher: Sync {
    async fn publish(&self, readings: &ReadingSet) -> Result;
}

#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("failed to fetch the readings: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to publish the readings: {0:#}")]
    Publish(Error),
}

/// Fetch-map-publish pipeline, keeping the last successfully mapped readings.
#[derive(bon::Builder)]
pub struct Cycle<P, S> {
    portal: P,
    publisher: S,

    /// Upper bound on a single fetch.
    #[builder(into)]
    timeout: Duration,

    #[builder(skip)]
    last_readings: Option<ReadingSet>,
}

impl<P: Portal, S: Publisher> Cycle<P, S> {
    /// Readings of the latest successful fetch, if any.
    pub const fn last_readings(&self) -> Option<&ReadingSet> {
        self.last_readings.as_ref()
    }

    /// Run one cycle.
    ///
    /// A failed fetch leaves the previous readings untouched.
    #[instrument(skip_all, fields(account = %credentials.account_id()))]
    pub async fn run(&mut self, credentials: &Credentials) -> Result<&ReadingSet, CycleError> {
        info!("fetching…");
        let fetched = timeout(self.timeout, self.portal.fetch(credentials))
            .await
            .unwrap_or(Err(FetchError::Timeout))
            .inspect_err(|error| {
                let has_previous = self.last_readings.is_some();
                if error.is_retryable() {
                    warn!(has_previous, "fetch failed, will retry on the next cycle: {error}");
                } else {
                    error!(has_previous, "fetch failed, needs attention: {error}");
                }
            })?;
        info!(
            n_months = fetched.consumption.len(),
            n_days = fetched.daily.len(),
            price = ?fetched.price.rate,
            "fetched",
        );

        let readings = map(&fetched);
        let published = self.publisher.publish(&readings).await;
        let readings = self.last_readings.insert(readings);
        if let Err(error) = published {
            warn!("failed to publish the readings: {error:#}");
            return Err(CycleError::Publish(error));
        }
        info!(n_readings = readings.0.len(), "published");
        Ok(readings)
    }
}
