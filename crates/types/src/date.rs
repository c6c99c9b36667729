//! Boundary parsing for calendar dates.
//!
//! The host UI hands dates around as plain `YYYY-MM-DD` strings, with `""` standing in for an
//! unset optional field. These helpers turn those strings into [`NaiveDate`] values and reject
//! anything the dating engine should never see.

use chrono::{Datelike, NaiveDate};

/// Earliest year accepted at the boundary.
pub const MIN_YEAR: i32 = 1900;

/// Latest year accepted at the boundary.
///
/// Keeps `date + 280 days` well inside chrono's representable range.
pub const MAX_YEAR: i32 = 2200;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors returned when a user-supplied date string cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("date cannot be empty")]
    Empty,

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    Invalid(String),

    #[error("date '{0}' is outside the supported range (1900-2200)")]
    OutOfRange(String),
}

/// Parses a required `YYYY-MM-DD` date.
///
/// Surrounding whitespace is ignored. Calendar-invalid dates such as `2024-02-30` are rejected.
///
/// # Errors
///
/// - [`DateError::Empty`] for blank input.
/// - [`DateError::Invalid`] if the text is not a real ISO calendar date.
/// - [`DateError::OutOfRange`] if the year falls outside [`MIN_YEAR`]..=[`MAX_YEAR`].
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateError::Empty);
    }

    let date = NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .map_err(|_| DateError::Invalid(trimmed.to_string()))?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return Err(DateError::OutOfRange(trimmed.to_string()));
    }

    Ok(date)
}

/// Parses an optional date field where `None` and blank strings both mean "not set".
///
/// # Errors
///
/// Same as [`parse_iso_date`] for non-blank input.
pub fn parse_optional_iso_date(input: Option<&str>) -> Result<Option<NaiveDate>, DateError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_iso_date(value).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let date = parse_iso_date("2024-03-01").expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let padded = parse_iso_date("  2024-10-07 ").expect("whitespace is trimmed");
        assert_eq!(padded, NaiveDate::from_ymd_opt(2024, 10, 7).unwrap());
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(parse_iso_date(""), Err(DateError::Empty));
        assert_eq!(parse_iso_date("   "), Err(DateError::Empty));
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert!(matches!(
            parse_iso_date("2024-02-30"),
            Err(DateError::Invalid(s)) if s == "2024-02-30"
        ));
        assert!(matches!(parse_iso_date("2023-02-29"), Err(DateError::Invalid(_))));
        assert!(parse_iso_date("2024-02-29").is_ok());
    }

    #[test]
    fn rejects_non_iso_formats() {
        assert!(matches!(parse_iso_date("01/03/2024"), Err(DateError::Invalid(_))));
        assert!(matches!(parse_iso_date("1 Mar 2024"), Err(DateError::Invalid(_))));
        assert!(matches!(
            parse_iso_date("2024-03-01T10:00:00Z"),
            Err(DateError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_years_outside_supported_range() {
        assert!(matches!(parse_iso_date("1899-12-31"), Err(DateError::OutOfRange(_))));
        assert!(matches!(parse_iso_date("2201-01-01"), Err(DateError::OutOfRange(_))));
        assert!(parse_iso_date("1900-01-01").is_ok());
        assert!(parse_iso_date("2200-12-31").is_ok());
    }

    #[test]
    fn optional_blank_means_unset() {
        assert_eq!(parse_optional_iso_date(None), Ok(None));
        assert_eq!(parse_optional_iso_date(Some("")), Ok(None));
        assert_eq!(parse_optional_iso_date(Some("  ")), Ok(None));
        assert_eq!(
            parse_optional_iso_date(Some("2024-12-05")),
            Ok(NaiveDate::from_ymd_opt(2024, 12, 5))
        );
        assert!(parse_optional_iso_date(Some("2024-13-01")).is_err());
    }
}
