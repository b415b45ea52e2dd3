//! Shapes the raw portal records into the fixed catalog of readings.
//!
//! The monthly history always occupies 12 slots. The window ends at the latest
//! recorded month, or at the month preceding the current one (as seen in the daily
//! breakdown) if that is newer, and months of the window without a record are
//! filled with placeholders.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};

use crate::{
    core::{
        month,
        reading::{Reading, ReadingSet, StateClass, Unit, Value},
        records::{ConsumptionRecord, DailyRecord, Fetched},
    },
    quantity::{cost::Kronor, energy::KilowattHours},
};

const N_MONTH_SLOTS: u32 = 12;

#[must_use]
#[derive(Clone, Debug, PartialEq)]
struct Slot {
    name: String,
    energy: KilowattHours,
    cost: Kronor,
}

impl Slot {
    const fn placeholder() -> Self {
        Self { name: String::new(), energy: KilowattHours::ZERO, cost: Kronor::ZERO }
    }
}

impl From<&ConsumptionRecord> for Slot {
    fn from(record: &ConsumptionRecord) -> Self {
        Self {
            name: month::format_label(record.month_start),
            energy: record.energy,
            cost: record.cost,
        }
    }
}

pub fn map(fetched: &Fetched) -> ReadingSet {
    let mut readings = Vec::with_capacity(3 * N_MONTH_SLOTS as usize + 5);

    for (index, slot) in (1..).zip(month_slots(&fetched.consumption, &fetched.daily)) {
        readings.push(Reading::new(format!("month_{index}_name"), Value::Text(slot.name), None));
        readings.push(Reading::new(
            format!("month_{index}_kwh"),
            Value::Number(slot.energy.0),
            Some(Unit::KilowattHours),
        ));
        readings.push(Reading::new(
            format!("month_{index}_cost"),
            Value::Number(slot.cost.0),
            Some(Unit::Kronor),
        ));
    }

    let total_energy: KilowattHours = fetched.daily.iter().map(|record| record.energy).sum();
    readings.push(
        Reading::new(
            "current_month_total_kwh",
            Value::Number(total_energy.0),
            Some(Unit::KilowattHours),
        )
        .with_state_class(StateClass::TotalIncreasing),
    );
    readings.push(Reading::new(
        "current_month_day_count",
        Value::Count(u32::try_from(fetched.daily.len()).unwrap_or(u32::MAX)),
        Some(Unit::Days),
    ));

    let today_energy = fetched
        .daily
        .iter()
        .max_by_key(|record| record.date)
        .map_or(KilowattHours::ZERO, |record| record.energy);
    readings.push(
        Reading::new("today_kwh", Value::Number(today_energy.0), Some(Unit::KilowattHours))
            .with_state_class(StateClass::Measurement),
    );

    readings.push(
        Reading::new(
            "price_per_kwh",
            Value::Number(fetched.price.rate.0),
            Some(Unit::KronorPerKilowattHour),
        )
        .with_state_class(StateClass::Measurement),
    );
    readings.push(Reading::new("price_valid_from", Value::Date(fetched.price.valid_from), None));

    ReadingSet(readings)
}

/// Lay the consumption records out onto the 12 chronological slots.
///
/// Without daily records the just-completed month is unknown, so the window ends at the latest
/// recorded month and a short history is padded on the left only.
fn month_slots(consumption: &[ConsumptionRecord], daily: &[DailyRecord]) -> Vec<Slot> {
    let mut by_month: BTreeMap<NaiveDate, &ConsumptionRecord> = BTreeMap::new();
    for record in consumption {
        // Later duplicates of the same month overwrite the earlier ones:
        by_month.insert(month::start_of(record.month_start), record);
    }

    let latest_recorded = by_month.keys().next_back().copied();
    let latest_complete =
        daily.iter().map(|record| record.date).max().and_then(month::preceding);
    let Some(newest) = latest_recorded.max(latest_complete) else {
        return vec![Slot::placeholder(); N_MONTH_SLOTS as usize];
    };

    (0..N_MONTH_SLOTS)
        .rev()
        .map(|offset| {
            newest
                .checked_sub_months(Months::new(offset))
                .and_then(|month_start| by_month.get(&month_start))
                .map_or_else(Slot::placeholder, |record| Slot::from(*record))
        })
        .collect()
}
