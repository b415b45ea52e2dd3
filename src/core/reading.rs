use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display, serde_with::SerializeDisplay)]
pub enum Unit {
    #[display("kWh")]
    KilowattHours,

    #[display("SEK")]
    Kronor,

    #[display("SEK/kWh")]
    KronorPerKilowattHour,

    #[display("days")]
    Days,
}

/// How the automation platform should treat the reading's history.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    TotalIncreasing,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Count(u32),
    Text(String),
    Date(NaiveDate),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => Display::fmt(number, f),
            Self::Count(count) => Display::fmt(count, f),
            Self::Text(text) => f.write_str(text),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reading {
    pub key: String,
    pub value: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_class: Option<StateClass>,
}

impl Reading {
    pub fn new(key: impl Into<String>, value: Value, unit: Option<Unit>) -> Self {
        Self { key: key.into(), value, unit, state_class: None }
    }

    pub const fn with_state_class(mut self, state_class: StateClass) -> Self {
        self.state_class = Some(state_class);
        self
    }
}

/// Complete set of readings produced by one cycle, in catalog order.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, derive_more::IntoIterator)]
#[serde(transparent)]
pub struct ReadingSet(#[into_iterator(owned, ref)] pub Vec<Reading>);

impl ReadingSet {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|reading| reading.key == key).map(|reading| &reading.value)
    }
}
