//! Display formatting for dates shown on pregnancy cards (`7 Oct 2024`).

use crate::constants::PLACEHOLDER;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

const DATE_FORMAT: &str = "%-d %b %Y";
const DATETIME_FORMAT: &str = "%-d %b %Y, %-I:%M %P";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats an instant in the given display offset, e.g. `1 Sep 2024, 5:30 pm`.
pub fn format_datetime(datetime: DateTime<Utc>, offset: FixedOffset) -> String {
    datetime
        .with_timezone(&offset)
        .format(DATETIME_FORMAT)
        .to_string()
}

/// [`format_date`], or `--` when the date is unknown.
pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
