//! Human-readable rendering of durations and instants.
//!
//! Both functions are pure: "now" is passed in rather than read from the clock,
//! so the same inputs always yield the same string.

use chrono::{DateTime, Local};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const SECS_PER_MONTH: u64 = 30 * SECS_PER_DAY;
const SECS_PER_YEAR: u64 = 365 * SECS_PER_DAY;

/// A duration broken into calendar-ish units. Any subset may be zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationParts {
    pub years: u64,
    pub months: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationParts {
    /// Splits `secs` into days, hours, minutes and seconds.
    ///
    /// Never carries into months or years; their length is ambiguous.
    pub fn from_secs(secs: u64) -> Self {
        Self {
            days: secs / SECS_PER_DAY,
            hours: secs % SECS_PER_DAY / SECS_PER_HOUR,
            minutes: secs % SECS_PER_HOUR / SECS_PER_MINUTE,
            seconds: secs % SECS_PER_MINUTE,
            ..Self::default()
        }
    }

    /// Total length in seconds, counting a month as 30 days and a year as 365.
    /// Saturates at `u64::MAX`.
    pub fn as_secs(&self) -> u64 {
        self.years
            .saturating_mul(SECS_PER_YEAR)
            .saturating_add(self.months.saturating_mul(SECS_PER_MONTH))
            .saturating_add(self.short_secs())
    }

    /// Days and below, in seconds. Saturates at `u64::MAX`.
    fn short_secs(&self) -> u64 {
        self.days
            .saturating_mul(SECS_PER_DAY)
            .saturating_add(self.hours.saturating_mul(SECS_PER_HOUR))
            .saturating_add(self.minutes.saturating_mul(SECS_PER_MINUTE))
            .saturating_add(self.seconds)
    }

    /// Re-normalizes the sub-month units, e.g. 90 minutes becomes 1 hour 30 minutes.
    pub fn normalized(&self) -> Self {
        Self {
            years: self.years,
            months: self.months,
            ..Self::from_secs(self.short_secs())
        }
    }

    fn units(&self) -> [(u64, &'static str); 6] {
        [
            (self.years, "year"),
            (self.months, "month"),
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
            (self.seconds, "second"),
        ]
    }
}

/// `{hours: 1, minutes: 30}` → `"1 hour, 30 minutes"`. All-zero → `""`.
pub fn format_duration(duration: &DurationParts) -> String {
    duration
        .units()
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| {
            if *n > 1 {
                format!("{n} {unit}s")
            } else {
                format!("{n} {unit}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `3:45pm` when `instant` is on the same local calendar day as `now`,
/// otherwise `March 4 at 3:45pm`.
pub fn format_date_time(instant: &DateTime<Local>, now: &DateTime<Local>) -> String {
    let time = instant.format("%-I:%M%P").to_string();
    if instant.date_naive() == now.date_naive() {
        time
    } else {
        format!("{} at {time}", instant.format("%B %-d"))
    }
}
