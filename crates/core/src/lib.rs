//! # Antenatal Core
//!
//! Pregnancy dating and the active-pregnancy record.
//!
//! This crate contains pure dating arithmetic and in-memory record management:
//! - [`dating`]: EDD from LMP, EDD precedence (`corrected > scan > lmp`), gestational age,
//!   trimester and progress
//! - [`summary`]: the single derived view shared by previews and stored records
//! - [`store`]: the one-active-pregnancy lifecycle (add, update, complete, remove)
//! - [`clock`]: injectable "now", so nothing here depends on wall-clock time in tests
//!
//! **No API concerns**: HTTP servers and command-line handling belong in `api-rest` and
//! `antenatal-cli`.

pub mod clock;
pub mod config;
pub mod constants;
pub mod dating;
pub mod error;
pub mod format;
pub mod pregnancy;
pub mod store;
pub mod summary;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use dating::{EddOverride, EddSource, GestationalAge, PregnancyDates, Trimester};
pub use error::{CoreError, CoreResult};
pub use pregnancy::{
    BabyGender, BabyStatus, CompletePregnancy, DeliveryMode, Outcome, OutcomeDetails,
    PregnancyField, PregnancyId, PregnancyRecord,
};
pub use store::PregnancyStore;
pub use summary::DatingSummary;

pub use antenatal_types::{parse_iso_date, parse_optional_iso_date, NonEmptyText};
