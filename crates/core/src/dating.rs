//! Pregnancy dating engine.
//!
//! Pure calendar arithmetic: EDD from LMP, EDD precedence (`corrected > scan > lmp`),
//! gestational age, trimester and progress. Nothing here reads a clock; every function that
//! depends on the current day takes `today` explicitly.
//!
//! Inputs are assumed to be well-formed calendar dates. Validation of user-entered strings
//! happens at the boundary (see `antenatal_types::parse_iso_date`).

use crate::constants::{
    DAYS_PER_WEEK, FULL_TERM_WEEKS, GESTATION_DAYS, SECOND_TRIMESTER_START_WEEK,
    THIRD_TRIMESTER_START_WEEK,
};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinician override of the due date.
///
/// Replaces the `(has_corrected_edd, corrected_edd)` pair used by data-entry forms: a corrected
/// date can only exist while the override is switched on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum EddOverride {
    #[default]
    None,
    Corrected(NaiveDate),
}

impl EddOverride {
    /// Build an override from the form representation.
    ///
    /// A date supplied while the flag is off is dropped. A flag without a date is treated as no
    /// override, so precedence falls through to scan/LMP dating.
    pub fn from_flag(has_corrected_edd: bool, corrected_edd: Option<NaiveDate>) -> Self {
        match (has_corrected_edd, corrected_edd) {
            (true, Some(date)) => Self::Corrected(date),
            _ => Self::None,
        }
    }

    pub fn corrected_edd(&self) -> Option<NaiveDate> {
        match self {
            Self::Corrected(date) => Some(*date),
            Self::None => None,
        }
    }

    pub fn is_corrected(&self) -> bool {
        matches!(self, Self::Corrected(_))
    }
}

/// The dating inputs held on a pregnancy record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregnancyDates {
    pub lmp: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_edd: Option<NaiveDate>,
    #[serde(default)]
    pub edd_override: EddOverride,
}

impl PregnancyDates {
    pub fn new(lmp: NaiveDate) -> Self {
        Self {
            lmp,
            scan_edd: None,
            edd_override: EddOverride::None,
        }
    }

    pub fn with_scan_edd(mut self, scan_edd: Option<NaiveDate>) -> Self {
        self.scan_edd = scan_edd;
        self
    }

    pub fn with_edd_override(mut self, edd_override: EddOverride) -> Self {
        self.edd_override = edd_override;
        self
    }

    /// Gestational age on `today`: scan-based when a scan EDD exists, LMP-based otherwise.
    pub fn gestational_age(&self, today: NaiveDate) -> GestationalAge {
        match self.scan_edd {
            Some(scan_edd) => GestationalAge::from_scan_edd(scan_edd, today),
            None => GestationalAge::from_lmp(self.lmp, today),
        }
    }
}

/// Which input a derived EDD came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EddSource {
    Corrected,
    Scan,
    Lmp,
}

impl EddSource {
    pub fn as_str(self) -> &'static str {
        match self {
            EddSource::Corrected => "corrected",
            EddSource::Scan => "scan",
            EddSource::Lmp => "lmp",
        }
    }

    /// Attribution line shown under a due date.
    pub fn attribution(self) -> &'static str {
        match self {
            EddSource::Corrected => "Corrected EDD",
            EddSource::Scan => "Calculated from Scan EDD",
            EddSource::Lmp => "Calculated from LMP",
        }
    }
}

impl fmt::Display for EddSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `lmp + 280` calendar days.
///
/// Saturates at `NaiveDate::MAX`; boundary-validated dates never get near it.
pub fn calculate_edd_from_lmp(lmp: NaiveDate) -> NaiveDate {
    lmp.checked_add_days(Days::new(GESTATION_DAYS as u64))
        .unwrap_or(NaiveDate::MAX)
}

/// The scan EDD when present, otherwise the LMP-derived EDD. Scan dates are never recomputed.
pub fn estimated_edd(dates: &PregnancyDates) -> NaiveDate {
    dates
        .scan_edd
        .unwrap_or_else(|| calculate_edd_from_lmp(dates.lmp))
}

pub fn estimated_edd_source(dates: &PregnancyDates) -> EddSource {
    if dates.scan_edd.is_some() {
        EddSource::Scan
    } else {
        EddSource::Lmp
    }
}

/// The corrected EDD when one is set, otherwise [`estimated_edd`].
pub fn final_edd(dates: &PregnancyDates) -> NaiveDate {
    dates
        .edd_override
        .corrected_edd()
        .unwrap_or_else(|| estimated_edd(dates))
}

pub fn final_edd_source(dates: &PregnancyDates) -> EddSource {
    if dates.edd_override.is_corrected() {
        EddSource::Corrected
    } else {
        estimated_edd_source(dates)
    }
}

/// Gestational age as completed weeks plus remaining days.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GestationalAge {
    pub weeks: i64,
    pub days: i64,
}

impl GestationalAge {
    /// Decompose a day count into weeks and days.
    ///
    /// Uses truncating division, so `weeks * 7 + days == total_days` also holds for negative
    /// counts (both parts carry the sign).
    pub fn from_days(total_days: i64) -> Self {
        Self {
            weeks: total_days / DAYS_PER_WEEK,
            days: total_days % DAYS_PER_WEEK,
        }
    }

    /// Elapsed days from `lmp` to `today`.
    ///
    /// Not clamped: an LMP in the future gives a negative age.
    pub fn from_lmp(lmp: NaiveDate, today: NaiveDate) -> Self {
        Self::from_days(today.signed_duration_since(lmp).num_days())
    }

    /// `280 - days remaining until the scan EDD`, clamped at zero.
    ///
    /// A scan EDD more than 280 days away yields `0w 0d` rather than a negative age.
    pub fn from_scan_edd(scan_edd: NaiveDate, today: NaiveDate) -> Self {
        let remaining = scan_edd.signed_duration_since(today).num_days();
        let elapsed = GESTATION_DAYS - remaining;
        if elapsed < 0 {
            return Self::default();
        }
        Self::from_days(elapsed)
    }

    pub fn total_days(&self) -> i64 {
        self.weeks * DAYS_PER_WEEK + self.days
    }

    pub fn trimester(&self) -> Trimester {
        Trimester::from_weeks(self.weeks)
    }
}

impl fmt::Display for GestationalAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}w {}d", self.weeks, self.days)
    }
}

/// Gestational age from whatever dating inputs are available.
///
/// Returns `None` when neither an LMP nor a scan EDD is known; callers render a placeholder.
pub fn gestational_age(
    lmp: Option<NaiveDate>,
    scan_edd: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<GestationalAge> {
    match (scan_edd, lmp) {
        (Some(scan_edd), _) => Some(GestationalAge::from_scan_edd(scan_edd, today)),
        (None, Some(lmp)) => Some(GestationalAge::from_lmp(lmp, today)),
        (None, None) => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// Weeks below 14 are first trimester, 14 to 27 second, 28 and above third.
    pub fn from_weeks(weeks: i64) -> Self {
        if weeks >= THIRD_TRIMESTER_START_WEEK {
            Trimester::Third
        } else if weeks >= SECOND_TRIMESTER_START_WEEK {
            Trimester::Second
        } else {
            Trimester::First
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Trimester::First => 1,
            Trimester::Second => 2,
            Trimester::Third => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trimester::First => "First Trimester",
            Trimester::Second => "Second Trimester",
            Trimester::Third => "Third Trimester",
        }
    }
}

/// Signed days from `today` to `final_edd`; zero or negative once the date has arrived.
pub fn days_until_edd(final_edd: NaiveDate, today: NaiveDate) -> i64 {
    final_edd.signed_duration_since(today).num_days()
}

pub fn is_due(days_until_edd: i64) -> bool {
    days_until_edd <= 0
}

/// `min(weeks / 40 * 100, 100)`.
pub fn pregnancy_progress_percent(ga_weeks: i64) -> f64 {
    (ga_weeks as f64 / FULL_TERM_WEEKS as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn edd_is_lmp_plus_280_days() {
        assert_eq!(calculate_edd_from_lmp(date(2024, 1, 1)), date(2024, 10, 7));
        assert_eq!(calculate_edd_from_lmp(date(2024, 3, 1)), date(2024, 12, 6));
        // Crosses a year boundary and a non-leap February.
        assert_eq!(calculate_edd_from_lmp(date(2022, 6, 15)), date(2023, 3, 22));

        let mut lmp = date(2023, 1, 1);
        while lmp < date(2025, 1, 1) {
            let edd = calculate_edd_from_lmp(lmp);
            assert_eq!(edd.signed_duration_since(lmp).num_days(), 280, "{lmp}");
            lmp = lmp.succ_opt().unwrap();
        }
    }

    #[test]
    fn edd_saturates_instead_of_panicking() {
        assert_eq!(calculate_edd_from_lmp(NaiveDate::MAX), NaiveDate::MAX);
    }

    #[test]
    fn scan_edd_wins_over_lmp() {
        let scan = date(2024, 11, 20);
        for lmp in [date(2024, 1, 1), date(2024, 3, 1), date(2023, 6, 30)] {
            let dates = PregnancyDates::new(lmp).with_scan_edd(Some(scan));
            assert_eq!(estimated_edd(&dates), scan);
            assert_eq!(estimated_edd_source(&dates), EddSource::Scan);
            assert_eq!(final_edd(&dates), scan);
            assert_eq!(final_edd_source(&dates), EddSource::Scan);
        }
    }

    #[test]
    fn corrected_edd_wins_over_scan_and_lmp() {
        let corrected = date(2024, 12, 1);
        let dates = PregnancyDates::new(date(2024, 3, 1))
            .with_scan_edd(Some(date(2024, 11, 20)))
            .with_edd_override(EddOverride::Corrected(corrected));

        assert_eq!(final_edd(&dates), corrected);
        assert_eq!(final_edd_source(&dates), EddSource::Corrected);
        // The estimate still reports the scan.
        assert_eq!(estimated_edd(&dates), date(2024, 11, 20));
        assert_eq!(estimated_edd_source(&dates), EddSource::Scan);
    }

    #[test]
    fn final_edd_falls_back_to_lmp() {
        let dates = PregnancyDates::new(date(2024, 3, 1));
        assert_eq!(final_edd(&dates), calculate_edd_from_lmp(date(2024, 3, 1)));
        assert_eq!(final_edd_source(&dates), EddSource::Lmp);
    }

    #[test]
    fn override_flag_off_discards_stale_date() {
        let stale = EddOverride::from_flag(false, Some(date(2024, 12, 1)));
        assert_eq!(stale, EddOverride::None);

        let dates = PregnancyDates::new(date(2024, 3, 1)).with_edd_override(stale);
        assert_eq!(final_edd_source(&dates), EddSource::Lmp);

        assert_eq!(EddOverride::from_flag(true, None), EddOverride::None);
        assert_eq!(
            EddOverride::from_flag(true, Some(date(2024, 12, 1))),
            EddOverride::Corrected(date(2024, 12, 1))
        );
    }

    #[test]
    fn decomposition_holds_for_all_day_counts() {
        for n in 0..=400 {
            let ga = GestationalAge::from_days(n);
            assert_eq!(ga.weeks, n / 7);
            assert!((0..=6).contains(&ga.days), "{n}");
            assert_eq!(ga.weeks * 7 + ga.days, n);
            assert_eq!(ga.total_days(), n);
        }
    }

    #[test]
    fn lmp_gestational_age_is_not_clamped() {
        let today = date(2024, 3, 1);
        let future_lmp = date(2024, 3, 11);
        let ga = GestationalAge::from_lmp(future_lmp, today);
        assert_eq!(ga, GestationalAge { weeks: -1, days: -3 });
        assert_eq!(ga.total_days(), -10);
    }

    #[test]
    fn scan_gestational_age_clamps_at_zero() {
        let today = date(2024, 1, 1);
        let far_scan_edd = date(2024, 11, 1); // 305 days away
        assert_eq!(
            GestationalAge::from_scan_edd(far_scan_edd, today),
            GestationalAge { weeks: 0, days: 0 }
        );

        // Exactly 280 days away is the first day of gestation.
        let edge = date(2024, 10, 7);
        assert_eq!(
            GestationalAge::from_scan_edd(edge, today),
            GestationalAge { weeks: 0, days: 0 }
        );
    }

    #[test]
    fn scan_gestational_age_counts_back_from_edd() {
        let today = date(2024, 9, 1);
        let scan = date(2024, 11, 20); // 80 days away -> 200 days elapsed
        assert_eq!(
            GestationalAge::from_scan_edd(scan, today),
            GestationalAge { weeks: 28, days: 4 }
        );

        // A scan EDD in the past keeps counting past term.
        let overdue = date(2024, 8, 25);
        assert_eq!(
            GestationalAge::from_scan_edd(overdue, today),
            GestationalAge { weeks: 41, days: 0 }
        );
    }

    #[test]
    fn gestational_age_prefers_scan_and_reports_missing_inputs() {
        let today = date(2024, 9, 1);
        let lmp = date(2024, 3, 1);
        let scan = date(2024, 11, 20);

        assert_eq!(
            gestational_age(Some(lmp), None, today),
            Some(GestationalAge { weeks: 26, days: 2 })
        );
        assert_eq!(
            gestational_age(Some(lmp), Some(scan), today),
            Some(GestationalAge { weeks: 28, days: 4 })
        );
        assert_eq!(
            gestational_age(None, Some(scan), today),
            Some(GestationalAge { weeks: 28, days: 4 })
        );
        assert_eq!(gestational_age(None, None, today), None);
    }

    #[test]
    fn trimester_boundaries() {
        assert_eq!(Trimester::from_weeks(0), Trimester::First);
        assert_eq!(Trimester::from_weeks(1), Trimester::First);
        assert_eq!(Trimester::from_weeks(13), Trimester::First);
        assert_eq!(Trimester::from_weeks(14), Trimester::Second);
        assert_eq!(Trimester::from_weeks(27), Trimester::Second);
        assert_eq!(Trimester::from_weeks(28), Trimester::Third);
        assert_eq!(Trimester::from_weeks(42), Trimester::Third);

        assert_eq!(Trimester::Second.number(), 2);
        assert_eq!(Trimester::Third.label(), "Third Trimester");
    }

    #[test]
    fn days_until_edd_is_signed() {
        let edd = date(2024, 12, 6);
        assert_eq!(days_until_edd(edd, date(2024, 9, 1)), 96);
        assert_eq!(days_until_edd(edd, edd), 0);
        assert_eq!(days_until_edd(edd, date(2024, 12, 10)), -4);

        assert!(!is_due(96));
        assert!(is_due(0));
        assert!(is_due(-4));
    }

    #[test]
    fn progress_is_capped_at_100() {
        assert_eq!(pregnancy_progress_percent(0), 0.0);
        assert_eq!(pregnancy_progress_percent(20), 50.0);
        assert_eq!(pregnancy_progress_percent(26), 65.0);
        assert_eq!(pregnancy_progress_percent(40), 100.0);
        assert_eq!(pregnancy_progress_percent(43), 100.0);
    }

    #[test]
    fn lmp_only_pregnancy_end_to_end() {
        let today = date(2024, 9, 1);
        let dates = PregnancyDates::new(date(2024, 3, 1));

        let ga = dates.gestational_age(today);
        assert_eq!(ga, GestationalAge { weeks: 26, days: 2 });
        assert_eq!(ga.total_days(), 184);
        assert_eq!(estimated_edd(&dates), date(2024, 12, 6));
        assert_eq!(ga.trimester(), Trimester::Second);
        assert_eq!(ga.trimester().number(), 2);
        assert_eq!(final_edd_source(&dates), EddSource::Lmp);
    }

    #[test]
    fn edd_override_serialises_as_tagged_union() {
        let json = serde_json::to_string(&EddOverride::Corrected(date(2024, 12, 1))).unwrap();
        assert_eq!(json, r#"{"kind":"corrected","date":"2024-12-01"}"#);

        let none: EddOverride = serde_json::from_str(r#"{"kind":"none"}"#).unwrap();
        assert_eq!(none, EddOverride::None);
    }
}
