//! Calendar months and the portal's Swedish month labels, for example `januari 2026`.

use chrono::{Datelike, Months, NaiveDate};

const NAMES: [&str; 12] = [
    "januari",
    "februari",
    "mars",
    "april",
    "maj",
    "juni",
    "juli",
    "augusti",
    "september",
    "oktober",
    "november",
    "december",
];

/// First day of the month which contains the date.
#[must_use]
pub fn start_of(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month preceding the date's month.
#[must_use]
pub fn preceding(date: NaiveDate) -> Option<NaiveDate> {
    start_of(date).checked_sub_months(Months::new(1))
}

/// Parse a label like `Januari 2026` into the first day of that month.
#[must_use]
pub fn parse_label(label: &str) -> Option<NaiveDate> {
    let mut words = label.split_whitespace();
    let (name, year) = (words.next()?, words.next()?);
    if words.next().is_some() {
        return None;
    }
    let name = name.to_lowercase();
    let month = NAMES.iter().position(|known| *known == name)?;
    let year = year.parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()? + 1, 1)
}

/// Format the date's month the way the portal labels it: lowercase month name and four-digit year.
#[must_use]
pub fn format_label(date: NaiveDate) -> String {
    format!("{} {:04}", NAMES[date.month0() as usize], date.year())
}
