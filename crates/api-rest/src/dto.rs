//! Request and response bodies.
//!
//! Dates travel as plain `YYYY-MM-DD` strings in both directions; blank strings in optional
//! request fields mean "not set". Display strings (`7 Oct 2024`, `26 weeks 2 days`) are
//! rendered here so every client shows the same text.

use antenatal_core::constants::{NOT_AVAILABLE, PLACEHOLDER};
use antenatal_core::format::{format_date, format_datetime, format_optional_date};
use antenatal_core::{
    DatingSummary, EddSource, GestationalAge, OutcomeDetails, PregnancyRecord, Trimester,
};
use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EddReq {
    /// First day of the last menstrual period (`YYYY-MM-DD`).
    pub lmp_date: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EddRes {
    pub lmp_date: String,
    pub edd: String,
    pub edd_display: String,
}

/// Dating inputs as entered on the add-pregnancy form.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct DatingPreviewReq {
    #[serde(default)]
    pub lmp_date: Option<String>,
    #[serde(default)]
    pub scan_edd: Option<String>,
    #[serde(default)]
    pub has_corrected_edd: bool,
    #[serde(default)]
    pub corrected_edd: Option<String>,
    /// Overrides the server's current date, for reproducible previews.
    #[serde(default)]
    pub today: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GestationalAgeDto {
    pub weeks: i64,
    pub days: i64,
    pub total_days: i64,
}

impl From<GestationalAge> for GestationalAgeDto {
    fn from(ga: GestationalAge) -> Self {
        Self {
            weeks: ga.weeks,
            days: ga.days,
            total_days: ga.total_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrimesterDto {
    pub trimester: u8,
    pub label: String,
}

impl From<Trimester> for TrimesterDto {
    fn from(trimester: Trimester) -> Self {
        Self {
            trimester: trimester.number(),
            label: trimester.label().to_string(),
        }
    }
}

/// Derived dating values. Every computed field is optional so a partially filled form can
/// still be previewed; display fields fall back to `--`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DatingSummaryRes {
    pub today: String,
    pub gestational_age: Option<GestationalAgeDto>,
    pub gestational_age_display: String,
    pub trimester: Option<TrimesterDto>,
    pub estimated_edd: Option<String>,
    pub estimated_edd_display: String,
    pub estimated_edd_source: Option<String>,
    pub estimated_edd_attribution: Option<String>,
    pub final_edd: Option<String>,
    pub final_edd_display: String,
    pub final_edd_source: Option<String>,
    pub final_edd_attribution: Option<String>,
    pub days_until_edd: Option<i64>,
    pub is_due: Option<bool>,
    pub progress_percent: Option<f64>,
}

fn gestational_age_display(ga: Option<GestationalAge>) -> String {
    match ga {
        Some(ga) => format!("{} weeks {} days", ga.weeks, ga.days),
        None => PLACEHOLDER.to_string(),
    }
}

fn source_fields(source: EddSource) -> (Option<String>, Option<String>) {
    (
        Some(source.as_str().to_string()),
        Some(source.attribution().to_string()),
    )
}

impl DatingSummaryRes {
    /// Only the gestational age is known (no LMP yet); EDD fields render as placeholders.
    pub fn partial(today: NaiveDate, gestational_age: Option<GestationalAge>) -> Self {
        Self {
            today: today.to_string(),
            gestational_age: gestational_age.map(Into::into),
            gestational_age_display: gestational_age_display(gestational_age),
            trimester: gestational_age.map(|ga| ga.trimester().into()),
            estimated_edd: None,
            estimated_edd_display: format_optional_date(None),
            estimated_edd_source: None,
            estimated_edd_attribution: None,
            final_edd: None,
            final_edd_display: format_optional_date(None),
            final_edd_source: None,
            final_edd_attribution: None,
            days_until_edd: None,
            is_due: None,
            progress_percent: gestational_age.map(|ga| {
                antenatal_core::dating::pregnancy_progress_percent(ga.weeks)
            }),
        }
    }
}

impl From<DatingSummary> for DatingSummaryRes {
    fn from(summary: DatingSummary) -> Self {
        let (estimated_edd_source, estimated_edd_attribution) =
            source_fields(summary.estimated_edd_source);
        let (final_edd_source, final_edd_attribution) = source_fields(summary.final_edd_source);

        Self {
            today: summary.today.to_string(),
            gestational_age: Some(summary.gestational_age.into()),
            gestational_age_display: gestational_age_display(Some(summary.gestational_age)),
            trimester: Some(summary.trimester.into()),
            estimated_edd: Some(summary.estimated_edd.to_string()),
            estimated_edd_display: format_date(summary.estimated_edd),
            estimated_edd_source,
            estimated_edd_attribution,
            final_edd: Some(summary.final_edd.to_string()),
            final_edd_display: format_date(summary.final_edd),
            final_edd_source,
            final_edd_attribution,
            days_until_edd: Some(summary.days_until_edd),
            is_due: Some(summary.is_due),
            progress_percent: Some(summary.progress_percent),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePregnancyReq {
    pub lmp_date: String,
    #[serde(default)]
    pub scan_edd: Option<String>,
    #[serde(default)]
    pub has_corrected_edd: bool,
    #[serde(default)]
    pub corrected_edd: Option<String>,
    /// Name of the person recording the pregnancy.
    pub author: String,
}

/// One field edit on the ongoing pregnancy.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum PregnancyFieldChange {
    LmpDate {
        value: String,
    },
    /// A missing or blank value clears the scan EDD.
    ScanEdd {
        #[serde(default)]
        value: Option<String>,
    },
    CorrectedEdd {
        has_corrected_edd: bool,
        #[serde(default)]
        corrected_edd: Option<String>,
    },
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePregnancyReq {
    pub author: String,
    pub changes: Vec<PregnancyFieldChange>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompletePregnancyReq {
    /// `live_birth`, `stillbirth`, `miscarriage`, `abortion` or `ectopic`.
    pub outcome: String,
    pub outcome_date: String,
    /// `vaginal`, `assisted_vaginal` or `caesarean`.
    #[serde(default)]
    pub delivery_mode: Option<String>,
    #[serde(default)]
    pub birth_weight_grams: Option<u32>,
    /// `male`, `female` or `ambiguous`.
    #[serde(default)]
    pub baby_gender: Option<String>,
    /// `alive` or `deceased`.
    #[serde(default)]
    pub baby_status: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OutcomeDetailsRes {
    pub outcome_date: String,
    pub outcome_date_display: String,
    pub delivery_mode: String,
    pub birth_weight_grams: Option<u32>,
    pub baby_gender: String,
    pub baby_status: String,
    pub remarks: String,
}

impl From<&OutcomeDetails> for OutcomeDetailsRes {
    fn from(details: &OutcomeDetails) -> Self {
        let or_na = |label: Option<&str>| label.unwrap_or(NOT_AVAILABLE).to_string();

        Self {
            outcome_date: details.outcome_date.to_string(),
            outcome_date_display: format_date(details.outcome_date),
            delivery_mode: or_na(details.delivery_mode.map(|m| m.label())),
            birth_weight_grams: details.birth_weight_grams,
            baby_gender: or_na(details.baby_gender.map(|g| g.label())),
            baby_status: or_na(details.baby_status.map(|s| s.label())),
            remarks: or_na(details.remarks.as_ref().map(|r| r.as_str())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PregnancyRes {
    pub id: String,
    pub outcome: String,
    pub outcome_label: String,
    pub lmp_date: String,
    pub lmp_display: String,
    pub scan_edd: Option<String>,
    pub has_corrected_edd: bool,
    pub corrected_edd: Option<String>,
    pub details: Option<OutcomeDetailsRes>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
    pub updated_display: String,
    /// Present while the pregnancy is ongoing.
    pub summary: Option<DatingSummaryRes>,
}

impl PregnancyRes {
    pub fn new(record: &PregnancyRecord, today: NaiveDate, offset: FixedOffset) -> Self {
        Self {
            id: record.id.to_string(),
            outcome: record.outcome.as_str().to_string(),
            outcome_label: record.outcome.label().to_string(),
            lmp_date: record.dates.lmp.to_string(),
            lmp_display: format_date(record.dates.lmp),
            scan_edd: record.dates.scan_edd.map(|d| d.to_string()),
            has_corrected_edd: record.dates.edd_override.is_corrected(),
            corrected_edd: record
                .dates
                .edd_override
                .corrected_edd()
                .map(|d| d.to_string()),
            details: record.details.as_ref().map(Into::into),
            created_at: record.audit.created_at.to_rfc3339(),
            created_by: record.audit.created_by.to_string(),
            updated_at: record.audit.updated_at.to_rfc3339(),
            updated_by: record.audit.updated_by.to_string(),
            updated_display: format_datetime(record.audit.updated_at, offset),
            summary: record.summary(today).map(Into::into),
        }
    }
}
