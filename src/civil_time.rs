//! Local civil time for a fixed-offset zone.
//!
//! The upstream API speaks in UTC (or offset-qualified) instants, while the
//! observed/forecast split and every label on the report are expressed in the
//! monitored site's wall-clock time. `LocalDateTime` is the only type that
//! carries wall-clock values around; it can only be produced from a zoned
//! instant through a `CivilZone`, so a naive value is never compared against a
//! zoned one by accident.

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use std::fmt;

/// Offset of Peru Time (PET), which has no daylight saving.
pub const PERU_UTC_OFFSET_HOURS: i32 = -5;

/// A fixed UTC offset used as the civil zone of the monitored site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilZone {
    offset: FixedOffset,
}

impl CivilZone {
    /// Zone at `hours` east of UTC (negative for west). `None` if out of range.
    pub fn from_utc_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours.checked_mul(3600)?).map(|offset| Self { offset })
    }

    pub fn peru() -> Self {
        Self {
            offset: FixedOffset::east_opt(PERU_UTC_OFFSET_HOURS * 3600)
                .expect("UTC-5 is a valid offset"),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Wall-clock time in this zone for the given instant.
    pub fn localize<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> LocalDateTime {
        LocalDateTime(instant.with_timezone(&self.offset).naive_local())
    }

    /// The given instant truncated to the start of its local hour.
    ///
    /// This is the observed/forecast cutoff of a run.
    pub fn hour_cutoff<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> LocalDateTime {
        self.localize(instant).truncate_to_hour()
    }

    /// Unix timestamp of local midnight on the local day containing `instant`.
    ///
    /// e.g. any instant on 2026-02-25 in UTC-5 → 1771995600
    /// (2026-02-25T00:00:00-05:00).
    pub fn local_midnight_timestamp<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> i64 {
        let midnight = self
            .localize(instant)
            .naive()
            .date()
            .and_time(NaiveTime::default());
        midnight.and_utc().timestamp() - i64::from(self.offset.local_minus_utc())
    }
}

impl Default for CivilZone {
    fn default() -> Self {
        Self::peru()
    }
}

/// A wall-clock date and time in a `CivilZone`, with the zone stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateTime(NaiveDateTime);

impl LocalDateTime {
    /// Builds a local value directly from wall-clock fields. Intended for
    /// configuration and tests; production values come from `CivilZone`.
    pub fn from_naive(naive: NaiveDateTime) -> Self {
        Self(naive)
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn truncate_to_hour(self) -> Self {
        let t = self.0;
        Self(
            t.with_minute(0)
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(t),
        )
    }

    /// `HH:MM`, the label used on chart axes and popups.
    pub fn hour_minute(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    /// `dd/mm/YYYY HH:MM`, the report's "updated" stamp.
    pub fn day_month_year_hm(&self) -> String {
        self.0.format("%d/%m/%Y %H:%M").to_string()
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}
