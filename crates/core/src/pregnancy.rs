//! Pregnancy record model.
//!
//! A [`PregnancyRecord`] starts `Ongoing` and moves exactly once to a terminal [`Outcome`].
//! While ongoing its [`PregnancyDates`] drive gestational-age computation; once completed they
//! are historical and the record carries [`OutcomeDetails`] instead.

use crate::dating::PregnancyDates;
use crate::summary::DatingSummary;
use crate::{CoreError, CoreResult};
use antenatal_types::NonEmptyText;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Identifier of a pregnancy record (32 lowercase hex characters, no hyphens).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PregnancyId(Uuid);

impl Default for PregnancyId {
    fn default() -> Self {
        Self::new()
    }
}

impl PregnancyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] for hyphenated, uppercase, or non-hex input.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let canonical = input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !canonical {
            return Err(CoreError::InvalidInput(format!(
                "pregnancy id must be 32 lowercase hex characters, got: '{input}'"
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| CoreError::InvalidInput(format!("invalid pregnancy id: {e}")))
    }
}

impl fmt::Display for PregnancyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for PregnancyId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PregnancyId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PregnancyId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PregnancyId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Declares a closed vocabulary with snake_case wire names and display labels.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident ($what:literal) {
            $($variant:ident => $wire:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(CoreError::InvalidInput(format!(
                        concat!("unknown ", $what, " '{}'"),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

vocabulary! {
    /// Pregnancy outcome. Everything except `Ongoing` is terminal.
    Outcome ("outcome") {
        Ongoing => "ongoing", "Ongoing";
        LiveBirth => "live_birth", "Live Birth";
        Stillbirth => "stillbirth", "Stillbirth";
        Miscarriage => "miscarriage", "Miscarriage";
        Abortion => "abortion", "Abortion";
        Ectopic => "ectopic", "Ectopic";
    }
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }
}

vocabulary! {
    DeliveryMode ("delivery mode") {
        Vaginal => "vaginal", "Normal Vaginal Delivery";
        AssistedVaginal => "assisted_vaginal", "Assisted Vaginal Delivery";
        Caesarean => "caesarean", "Caesarean Section";
    }
}

vocabulary! {
    BabyGender ("baby gender") {
        Male => "male", "Male";
        Female => "female", "Female";
        Ambiguous => "ambiguous", "Ambiguous";
    }
}

vocabulary! {
    BabyStatus ("baby status") {
        Alive => "alive", "Alive";
        Deceased => "deceased", "Deceased";
    }
}

/// Heaviest plausible birth weight accepted at completion.
const MAX_BIRTH_WEIGHT_GRAMS: u32 = 7_000;

/// Details stamped on a record when it is completed. Unset fields render as `NA`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDetails {
    pub outcome_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_mode: Option<DeliveryMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_weight_grams: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baby_gender: Option<BabyGender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baby_status: Option<BabyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<NonEmptyText>,
}

impl OutcomeDetails {
    pub fn new(outcome_date: NaiveDate) -> Self {
        Self {
            outcome_date,
            delivery_mode: None,
            birth_weight_grams: None,
            baby_gender: None,
            baby_status: None,
            remarks: None,
        }
    }
}

/// Request to move an ongoing record to a terminal outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletePregnancy {
    pub outcome: Outcome,
    pub details: OutcomeDetails,
}

impl CompletePregnancy {
    /// Checks the request against the record it will complete.
    ///
    /// # Errors
    ///
    /// - [`CoreError::OngoingIsNotAnOutcome`] if `outcome` is `Ongoing`.
    /// - [`CoreError::InvalidInput`] if the outcome date precedes the LMP or the birth weight is
    ///   zero or implausibly large.
    pub fn validate(&self, dates: &PregnancyDates) -> CoreResult<()> {
        if !self.outcome.is_terminal() {
            return Err(CoreError::OngoingIsNotAnOutcome);
        }

        if self.details.outcome_date < dates.lmp {
            return Err(CoreError::InvalidInput(format!(
                "outcome date {} is before LMP {}",
                self.details.outcome_date, dates.lmp
            )));
        }

        if let Some(weight) = self.details.birth_weight_grams {
            if weight == 0 || weight > MAX_BIRTH_WEIGHT_GRAMS {
                return Err(CoreError::InvalidInput(format!(
                    "birth weight must be between 1 and {MAX_BIRTH_WEIGHT_GRAMS} grams, got {weight}"
                )));
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_at: DateTime<Utc>,
    pub created_by: NonEmptyText,
    pub updated_at: DateTime<Utc>,
    pub updated_by: NonEmptyText,
}

impl AuditInfo {
    pub fn new(author: NonEmptyText, now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            created_by: author.clone(),
            updated_at: now,
            updated_by: author,
        }
    }

    pub fn touch(&mut self, author: NonEmptyText, now: DateTime<Utc>) {
        self.updated_at = now;
        self.updated_by = author;
    }
}

/// A single field change applied to an ongoing record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PregnancyField {
    Lmp(NaiveDate),
    ScanEdd(Option<NaiveDate>),
    EddOverride(crate::dating::EddOverride),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregnancyRecord {
    pub id: PregnancyId,
    pub outcome: Outcome,
    pub dates: PregnancyDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<OutcomeDetails>,
    pub audit: AuditInfo,
}

impl PregnancyRecord {
    pub fn new(dates: PregnancyDates, author: NonEmptyText, now: DateTime<Utc>) -> Self {
        Self {
            id: PregnancyId::new(),
            outcome: Outcome::Ongoing,
            dates,
            details: None,
            audit: AuditInfo::new(author, now),
        }
    }

    pub fn is_active(&self) -> bool {
        self.outcome == Outcome::Ongoing
    }

    /// Dating summary on `today`, or `None` once the pregnancy is completed.
    pub fn summary(&self, today: NaiveDate) -> Option<DatingSummary> {
        self.is_active()
            .then(|| DatingSummary::compute(&self.dates, today))
    }

    pub(crate) fn apply(&mut self, field: PregnancyField) {
        match field {
            PregnancyField::Lmp(lmp) => self.dates.lmp = lmp,
            PregnancyField::ScanEdd(scan_edd) => self.dates.scan_edd = scan_edd,
            PregnancyField::EddOverride(edd_override) => self.dates.edd_override = edd_override,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dating::EddOverride;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn author() -> NonEmptyText {
        NonEmptyText::new("Dr. Kavya Rao").unwrap()
    }

    #[test]
    fn pregnancy_id_is_canonical() {
        let id = PregnancyId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 32);
        assert_eq!(PregnancyId::parse(&text).unwrap(), id);
    }

    #[test]
    fn pregnancy_id_rejects_non_canonical_forms() {
        for bad in [
            "550e8400-e29b-41d4-a716-446655440000",
            "550E8400E29B41D4A716446655440000",
            "550e8400e29b41d4a71644665544000",
            "550e8400e29b41d4a716446655440zzz",
        ] {
            let err = PregnancyId::parse(bad).expect_err("should reject");
            assert!(
                matches!(err, CoreError::InvalidInput(msg) if msg.contains("32 lowercase hex"))
            );
        }
    }

    #[test]
    fn vocabularies_round_trip_through_wire_names() {
        assert_eq!("live_birth".parse::<Outcome>().unwrap(), Outcome::LiveBirth);
        assert_eq!(Outcome::Ectopic.as_str(), "ectopic");
        assert_eq!(Outcome::LiveBirth.to_string(), "Live Birth");
        assert_eq!(
            "caesarean".parse::<DeliveryMode>().unwrap(),
            DeliveryMode::Caesarean
        );

        let err = "twins".parse::<Outcome>().expect_err("unknown outcome");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg == "unknown outcome 'twins'"));
    }

    #[test]
    fn only_ongoing_is_non_terminal() {
        assert!(!Outcome::Ongoing.is_terminal());
        for outcome in [
            Outcome::LiveBirth,
            Outcome::Stillbirth,
            Outcome::Miscarriage,
            Outcome::Abortion,
            Outcome::Ectopic,
        ] {
            assert!(outcome.is_terminal(), "{outcome}");
        }
    }

    #[test]
    fn completion_rejects_ongoing_and_bad_details() {
        let dates = PregnancyDates::new(date(2024, 3, 1));

        let ongoing = CompletePregnancy {
            outcome: Outcome::Ongoing,
            details: OutcomeDetails::new(date(2024, 12, 1)),
        };
        assert!(matches!(
            ongoing.validate(&dates),
            Err(CoreError::OngoingIsNotAnOutcome)
        ));

        let before_lmp = CompletePregnancy {
            outcome: Outcome::Miscarriage,
            details: OutcomeDetails::new(date(2024, 2, 1)),
        };
        assert!(matches!(
            before_lmp.validate(&dates),
            Err(CoreError::InvalidInput(msg)) if msg.contains("before LMP")
        ));

        let mut details = OutcomeDetails::new(date(2024, 12, 1));
        details.birth_weight_grams = Some(0);
        let weightless = CompletePregnancy {
            outcome: Outcome::LiveBirth,
            details,
        };
        assert!(weightless.validate(&dates).is_err());
    }

    #[test]
    fn completed_record_has_no_summary() {
        let now = "2024-09-01T06:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let mut record = PregnancyRecord::new(PregnancyDates::new(date(2024, 3, 1)), author(), now);
        assert!(record.summary(date(2024, 9, 1)).is_some());

        record.outcome = Outcome::LiveBirth;
        assert!(!record.is_active());
        assert!(record.summary(date(2024, 9, 1)).is_none());
    }

    #[test]
    fn record_serialises_without_unset_fields() {
        let now = "2024-09-01T06:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let record = PregnancyRecord::new(
            PregnancyDates::new(date(2024, 3, 1)).with_edd_override(EddOverride::None),
            author(),
            now,
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["outcome"], "ongoing");
        assert_eq!(json["dates"]["lmp"], "2024-03-01");
        assert!(json["dates"].get("scan_edd").is_none());
        assert!(json.get("details").is_none());
        assert_eq!(json["audit"]["created_by"], "Dr. Kavya Rao");

        let back: PregnancyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
