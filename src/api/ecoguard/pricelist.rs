use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, de};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::{
    core::{portal::FetchError, records::PriceRecord},
    quantity::Quantity,
};

#[derive(Deserialize)]
pub struct PriceLists {
    #[serde(rename = "PriceLists", default)]
    price_lists: Vec<PriceList>,
}

#[derive(Deserialize)]
struct PriceList {
    /// Validity interval, it starts with the `YYYY-MM-DD` date it takes effect.
    #[serde(rename = "Interval", deserialize_with = "deserialize_interval_start")]
    valid_from: NaiveDate,

    #[serde(rename = "Components", default)]
    components: Vec<Component>,
}

#[serde_as]
#[derive(Deserialize)]
struct Component {
    #[serde(rename = "Rate")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    rate: f64,
}

impl PriceLists {
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        serde_json::from_str(body).map_err(|error| {
            FetchError::UnexpectedResponseShape(format!("invalid price lists: {error}"))
        })
    }

    /// The first component of the first price list is the current price.
    pub fn into_current(self) -> Result<PriceRecord, FetchError> {
        let price_list = self.price_lists.into_iter().next().ok_or_else(|| {
            FetchError::UnexpectedResponseShape("there are no price lists".into())
        })?;
        let component = price_list.components.first().ok_or_else(|| {
            FetchError::UnexpectedResponseShape("the price list has no components".into())
        })?;
        Ok(PriceRecord { rate: Quantity(component.rate), valid_from: price_list.valid_from })
    }
}

fn deserialize_interval_start<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDate, D::Error> {
    let interval = String::deserialize(deserializer)?;
    interval
        .trim()
        .get(..10)
        .and_then(|start| NaiveDate::parse_from_str(start, "%Y-%m-%d").ok())
        .ok_or_else(|| de::Error::invalid_value(de::Unexpected::Str(&interval), &"YYYY-MM-DD…"))
}
