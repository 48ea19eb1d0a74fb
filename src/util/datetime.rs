use anyhow::{anyhow, Result};
use chrono::{Local, Months, NaiveDate};

/// 日線資料的日期格式，例︰2020-04-03
const SERIES_DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns the current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Subtracts `months` calendar months from `date`.
///
/// The day of month is clamped to the last day of the target month, so
/// `2024-03-31` minus one month is `2024-02-29`.
///
/// # Errors
///
/// Returns an error when the result falls outside the range `NaiveDate`
/// can represent.
pub fn months_before(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_sub_months(Months::new(months))
        .ok_or_else(|| anyhow!("Failed to subtract {} months from {}", months, date))
}

/// Parses a `YYYY-MM-DD` date string.
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), SERIES_DATE_FORMAT)
        .map_err(|why| anyhow!("Failed to parse date string '{}': {}", date_str, why))
}

/// Formats a date as `M/D/YYYY` without zero padding.
pub fn to_short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}
