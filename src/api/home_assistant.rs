use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    Url,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;

use crate::{
    api::client,
    core::{
        cycle::Publisher,
        reading::{Reading, ReadingSet, StateClass, Unit},
    },
    prelude::*,
};

/// Home Assistant [REST API](https://developers.home-assistant.io/docs/api/rest/) client
/// publishing every reading as a sensor state.
pub struct Api {
    client: Client,
    base_url: Url,
    entity_prefix: String,

    /// Account identity shared by all the sensors.
    device: String,
}

impl Api {
    pub fn try_new(
        access_token: &str,
        base_url: Url,
        entity_prefix: String,
        device: String,
    ) -> Result<Self> {
        ensure!(!base_url.cannot_be_a_base(), "`{base_url}` cannot be a base URL");
        let headers = HeaderMap::from_iter([(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {access_token}"))?,
        )]);
        let client = client::builder(Duration::from_secs(10)).default_headers(headers).build()?;
        Ok(Self { client, base_url, entity_prefix, device })
    }

    fn entity_id(&self, key: &str) -> String {
        format!("sensor.{}_{key}", self.entity_prefix)
    }

    #[instrument(skip_all, fields(entity_id = entity_id))]
    async fn set_state(&self, entity_id: &str, state: &State<'_>) -> Result {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL"))?
            .pop_if_empty()
            .push("states")
            .push(entity_id);
        self.client
            .post(url)
            .json(state)
            .send()
            .await
            .with_context(|| format!("failed to set `{entity_id}`"))?
            .error_for_status()
            .with_context(|| format!("failed to set `{entity_id}`"))?;
        trace!(state = %state.state, "set");
        Ok(())
    }
}

#[async_trait]
impl Publisher for Api {
    #[instrument(skip_all, fields(n_readings = readings.0.len()))]
    async fn publish(&self, readings: &ReadingSet) -> Result {
        info!("publishing the readings…");
        let mut n_failed = 0_usize;
        let mut first_error = None;
        for reading in readings {
            let entity_id = self.entity_id(&reading.key);
            if let Err(error) = self.set_state(&entity_id, &State::new(reading, &self.device)).await
            {
                warn!("{error:#}");
                n_failed += 1;
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(error.context(format!(
                "failed to publish {n_failed} of {} readings",
                readings.0.len()
            ))),
            None => Ok(()),
        }
    }
}

#[derive(Serialize)]
struct State<'a> {
    state: String,
    attributes: Attributes<'a>,
}

#[derive(Serialize)]
struct Attributes<'a> {
    friendly_name: String,
    device: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    unit_of_measurement: Option<Unit>,

    #[serde(skip_serializing_if = "Option::is_none")]
    device_class: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    state_class: Option<StateClass>,
}

impl<'a> State<'a> {
    fn new(reading: &Reading, device: &'a str) -> Self {
        let device_class = match reading.unit {
            Some(Unit::KilowattHours) => Some("energy"),
            Some(Unit::Kronor) => Some("monetary"),
            _ => None,
        };
        Self {
            state: reading.value.to_string(),
            attributes: Attributes {
                friendly_name: format!("Ecoguard {}", reading.key.replace('_', " ")),
                device,
                unit_of_measurement: reading.unit,
                device_class,
                state_class: reading.state_class,
            },
        }
    }
}
