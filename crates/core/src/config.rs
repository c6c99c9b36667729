//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into core services, so request
//! handling never reads process-wide environment variables.

use crate::constants::DEFAULT_UTC_OFFSET;
use crate::{CoreError, CoreResult};
use chrono::{FixedOffset, Offset, Utc};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    utc_offset: FixedOffset,
}

impl CoreConfig {
    pub fn new(utc_offset: FixedOffset) -> Self {
        Self { utc_offset }
    }

    /// Offset used to decide which calendar day "today" is and to render timestamps.
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        let utc_offset = parse_utc_offset(DEFAULT_UTC_OFFSET).unwrap_or_else(|_| Utc.fix());
        Self { utc_offset }
    }
}

/// Parse a `+HH:MM` / `-HH:MM` offset string.
///
/// `Z` is accepted as UTC.
///
/// # Errors
///
/// Returns [`CoreError::InvalidUtcOffset`] when the text is malformed or the offset exceeds
/// ±23:59.
pub fn parse_utc_offset(value: &str) -> CoreResult<FixedOffset> {
    let value = value.trim();

    if value.eq_ignore_ascii_case("z") {
        return Ok(Utc.fix());
    }

    value
        .parse::<FixedOffset>()
        .map_err(|_| CoreError::InvalidUtcOffset(value.to_string()))
}

/// Resolve the UTC offset from an optional environment value.
///
/// If `value` is `None` or blank, returns the default deployment offset.
pub fn utc_offset_from_env_value(value: Option<String>) -> CoreResult<FixedOffset> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(v) => parse_utc_offset(&v),
        None => parse_utc_offset(DEFAULT_UTC_OFFSET),
    }
}
