//! Constants used throughout the antenatal core crate.
//!
//! Obstetric dating conventions are fixed; keeping them here means every calculation and every
//! test reads the same values.

/// Naegele's rule: the EDD falls 280 days (40 weeks) after the first day of the LMP.
pub const GESTATION_DAYS: i64 = 280;

pub const DAYS_PER_WEEK: i64 = 7;

/// Gestational weeks at term, used as the denominator for progress.
pub const FULL_TERM_WEEKS: i64 = 40;

/// First gestational week of the second trimester.
pub const SECOND_TRIMESTER_START_WEEK: i64 = 14;

/// First gestational week of the third trimester.
pub const THIRD_TRIMESTER_START_WEEK: i64 = 28;

/// UTC offset used for "today" when nothing else is configured (India Standard Time).
pub const DEFAULT_UTC_OFFSET: &str = "+05:30";

/// Display text for a value that cannot be computed.
pub const PLACEHOLDER: &str = "--";

/// Display text for outcome details that have not been recorded.
pub const NOT_AVAILABLE: &str = "NA";
