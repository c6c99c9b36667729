//! Everything a pregnancy card shows, computed in one place.
//!
//! The add-pregnancy preview and the stored-record view both go through
//! [`DatingSummary::compute`], so a preview can never disagree with what is saved.

use crate::dating::{
    days_until_edd, estimated_edd, estimated_edd_source, final_edd, final_edd_source, is_due,
    pregnancy_progress_percent, EddSource, GestationalAge, PregnancyDates, Trimester,
};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DatingSummary {
    pub today: NaiveDate,
    pub gestational_age: GestationalAge,
    pub trimester: Trimester,
    pub estimated_edd: NaiveDate,
    pub estimated_edd_source: EddSource,
    pub final_edd: NaiveDate,
    pub final_edd_source: EddSource,
    pub days_until_edd: i64,
    pub is_due: bool,
    pub progress_percent: f64,
}

impl DatingSummary {
    pub fn compute(dates: &PregnancyDates, today: NaiveDate) -> Self {
        let gestational_age = dates.gestational_age(today);
        let final_edd = final_edd(dates);
        let days_until_edd = days_until_edd(final_edd, today);

        let summary = Self {
            today,
            gestational_age,
            trimester: gestational_age.trimester(),
            estimated_edd: estimated_edd(dates),
            estimated_edd_source: estimated_edd_source(dates),
            final_edd,
            final_edd_source: final_edd_source(dates),
            days_until_edd,
            is_due: is_due(days_until_edd),
            progress_percent: pregnancy_progress_percent(gestational_age.weeks),
        };

        tracing::debug!(
            %today,
            ga = %summary.gestational_age,
            final_edd = %summary.final_edd,
            source = %summary.final_edd_source,
            "computed dating summary"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dating::EddOverride;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lmp_only_summary() {
        let dates = PregnancyDates::new(date(2024, 3, 1));
        let summary = DatingSummary::compute(&dates, date(2024, 9, 1));

        assert_eq!(summary.gestational_age, GestationalAge { weeks: 26, days: 2 });
        assert_eq!(summary.trimester, Trimester::Second);
        assert_eq!(summary.estimated_edd, date(2024, 12, 6));
        assert_eq!(summary.estimated_edd_source, EddSource::Lmp);
        assert_eq!(summary.final_edd, date(2024, 12, 6));
        assert_eq!(summary.final_edd_source, EddSource::Lmp);
        assert_eq!(summary.days_until_edd, 96);
        assert!(!summary.is_due);
        assert_eq!(summary.progress_percent, 65.0);
    }

    #[test]
    fn corrected_edd_drives_countdown_but_not_gestational_age() {
        let dates = PregnancyDates::new(date(2024, 3, 1))
            .with_scan_edd(Some(date(2024, 11, 20)))
            .with_edd_override(EddOverride::Corrected(date(2024, 8, 30)));
        let summary = DatingSummary::compute(&dates, date(2024, 9, 1));

        // Scan-based gestational age: 280 - 80 days remaining.
        assert_eq!(summary.gestational_age, GestationalAge { weeks: 28, days: 4 });
        assert_eq!(summary.trimester, Trimester::Third);
        assert_eq!(summary.estimated_edd_source, EddSource::Scan);
        assert_eq!(summary.final_edd, date(2024, 8, 30));
        assert_eq!(summary.final_edd_source, EddSource::Corrected);
        assert_eq!(summary.days_until_edd, -2);
        assert!(summary.is_due);
    }

    #[test]
    fn serialises_with_snake_case_sources() {
        let dates = PregnancyDates::new(date(2024, 3, 1));
        let summary = DatingSummary::compute(&dates, date(2024, 9, 1));
        let json = serde_json::to_value(summary).unwrap();

        assert_eq!(json["final_edd"], "2024-12-06");
        assert_eq!(json["final_edd_source"], "lmp");
        assert_eq!(json["trimester"], "second");
        assert_eq!(json["gestational_age"]["weeks"], 26);
        assert_eq!(json["gestational_age"]["days"], 2);
    }
}
