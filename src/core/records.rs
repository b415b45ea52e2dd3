use chrono::NaiveDate;

use crate::quantity::{cost::Kronor, energy::KilowattHours, rate::KilowattHourRate};

/// One row of the latest-year consumption table.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConsumptionRecord {
    pub month_start: NaiveDate,
    pub energy: KilowattHours,
    pub cost: Kronor,
}

/// One row of the current-month table.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub energy: KilowattHours,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PriceRecord {
    pub rate: KilowattHourRate,
    pub valid_from: NaiveDate,
}

/// Everything a single successful fetch returns, exactly as the portal structured it.
#[must_use]
#[derive(Clone, Debug, PartialEq, bon::Builder)]
pub struct Fetched {
    #[builder(default)]
    pub consumption: Vec<ConsumptionRecord>,

    #[builder(default)]
    pub daily: Vec<DailyRecord>,

    pub price: PriceRecord,
}
