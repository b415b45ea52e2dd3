//! Portal HTML pages: the logon form and the consumption tables.

use std::sync::LazyLock;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::{
    core::{
        month,
        portal::FetchError,
        records::{ConsumptionRecord, DailyRecord},
    },
    quantity::Quantity,
};

static TOKEN_INPUT: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"input[name="__RequestVerificationToken"]"#));
static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static BODY_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tbody tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

fn selector(selectors: &str) -> Selector {
    Selector::parse(selectors).expect("the selector should be valid")
}

/// Anti-forgery token of the logon form.
pub fn parse_verification_token(html: &str) -> Option<String> {
    Html::parse_document(html)
        .select(&TOKEN_INPUT)
        .find_map(|input| input.value().attr("value"))
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

/// Latest year consumption table: `month label | kWh | cost`.
pub fn parse_consumption(html: &str) -> Result<Vec<ConsumptionRecord>, FetchError> {
    body_rows(html)?
        .into_iter()
        .filter(|cells| cells.len() >= 3)
        .map(|cells| {
            let month_start = month::parse_label(&cells[0]).ok_or_else(|| {
                FetchError::UnexpectedResponseShape(format!("invalid month `{}`", cells[0]))
            })?;
            Ok(ConsumptionRecord {
                month_start,
                energy: Quantity(parse_value(&cells[1])?.unwrap_or_default()),
                cost: Quantity(parse_value(&cells[2])?.unwrap_or_default()),
            })
        })
        .collect()
}

/// Current month table: `YYYY-MM-DD | kWh`, days without a value are skipped.
pub fn parse_daily(html: &str) -> Result<Vec<DailyRecord>, FetchError> {
    let mut records = Vec::new();
    for cells in body_rows(html)?.into_iter().filter(|cells| cells.len() >= 2) {
        let date = NaiveDate::parse_from_str(&cells[0], "%Y-%m-%d").map_err(|_| {
            FetchError::UnexpectedResponseShape(format!("invalid date `{}`", cells[0]))
        })?;
        if let Some(energy) = parse_value(&cells[1])? {
            records.push(DailyRecord { date, energy: Quantity(energy) });
        }
    }
    Ok(records)
}

/// Trimmed cell texts of every body row of the page's table.
///
/// A page without a table means the portal has changed its layout.
fn body_rows(html: &str) -> Result<Vec<Vec<String>>, FetchError> {
    let document = Html::parse_document(html);
    let table = document.select(&TABLE).next().ok_or_else(|| {
        FetchError::UnexpectedResponseShape("there is no table on the page".into())
    })?;
    Ok(table.select(&BODY_ROW).map(|row| row.select(&CELL).map(cell_text).collect()).collect())
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_owned()
}

/// Parse a decimal-comma number, `-` and empty cells have no value.
fn parse_value(text: &str) -> Result<Option<f64>, FetchError> {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if normalized.is_empty() || normalized == "-" {
        return Ok(None);
    }
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(Some)
        .ok_or_else(|| FetchError::UnexpectedResponseShape(format!("invalid number `{text}`")))
}
