//! Injectable "now".
//!
//! Gestational age and days-until-EDD are relative to the current calendar day. Nothing in this
//! crate reads the system clock directly; services hold a [`Clock`] and the pure dating functions
//! take `today` as an argument.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in the clock's local offset.
    fn today(&self) -> NaiveDate;
}

/// Wall clock, with "today" taken in a fixed UTC offset.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// A clock pinned to one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Pins the clock to midday UTC on `date`, so "today" is `date` for any offset within ±11:59.
    pub fn on_date(date: NaiveDate, offset: FixedOffset) -> Self {
        let midday = date
            .and_hms_opt(12, 0, 0)
            .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
        Self::new(midday.and_utc(), offset)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.offset).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_utc_offset;

    #[test]
    fn fixed_clock_today_respects_offset() {
        // 20:00 UTC is already the next day in IST.
        let now = "2024-09-01T20:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let ist = FixedClock::new(now, parse_utc_offset("+05:30").unwrap());
        let utc = FixedClock::new(now, parse_utc_offset("+00:00").unwrap());

        assert_eq!(ist.today(), NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
        assert_eq!(utc.today(), NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(ist.now(), now);
    }

    #[test]
    fn on_date_pins_today() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        for offset in ["+05:30", "-08:00", "+11:00"] {
            let clock = FixedClock::on_date(date, parse_utc_offset(offset).unwrap());
            assert_eq!(clock.today(), date, "{offset}");
        }
    }
}
