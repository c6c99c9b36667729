//! Validated primitives shared across the antenatal crates.
//!
//! Everything that arrives from a user (REST body, CLI argument, form field) passes through the
//! constructors in this crate before it reaches the dating engine. The engine itself assumes its
//! inputs are well-formed and never signals validation errors.
//!
//! - [`NonEmptyText`]: trimmed text guaranteed to contain at least one non-whitespace character.
//! - [`parse_iso_date`] / [`parse_optional_iso_date`]: `YYYY-MM-DD` calendar dates within the
//!   range the engine supports.

mod date;
mod text;

pub use date::{parse_iso_date, parse_optional_iso_date, DateError, MAX_YEAR, MIN_YEAR};
pub use text::{NonEmptyText, TextError};
