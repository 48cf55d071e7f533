//! Wall-clock helpers shared by the schedule model, the slot generator and
//! the booking guard.
//!
//! Times of day travel as zero-padded 24-hour `HH:MM` strings and calendar
//! dates as `YYYY-MM-DD`. Arithmetic is done in minutes since midnight so
//! that a service running past the end of the day can never wrap around to
//! the early morning.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::errors::{SalonError, SalonResult};

/// Spacing between consecutive candidate start times.
pub const SLOT_STEP_MINUTES: u32 = 15;

/// Duration used by availability queries that name neither a duration nor a service.
pub const DEFAULT_SERVICE_DURATION_MINUTES: u32 = 30;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parses `HH:MM`, also accepting the `HH:MM:SS` form the store hands back.
pub fn parse_time(value: &str) -> SalonResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| SalonError::Validation(format!("Invalid time '{}', expected HH:MM", value)))
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn parse_date(value: &str) -> SalonResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        SalonError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value))
    })
}

pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Converts minutes since midnight back into a time of day, `None` at or past midnight.
pub fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Rejects durations that cannot describe a service within a single day.
pub fn validate_duration(minutes: u32) -> SalonResult<()> {
    if minutes == 0 {
        return Err(SalonError::Validation(
            "Service duration must be at least one minute".to_string(),
        ));
    }
    if minutes > MINUTES_PER_DAY {
        return Err(SalonError::Validation(format!(
            "Service duration must not exceed {} minutes",
            MINUTES_PER_DAY
        )));
    }
    Ok(())
}

/// Adds a service duration to a start time; the result must stay on the same day.
pub fn add_minutes(start: NaiveTime, minutes: u32) -> SalonResult<NaiveTime> {
    minute_of_day(start)
        .checked_add(minutes)
        .and_then(time_from_minutes)
        .ok_or_else(|| {
            SalonError::Validation(format!(
                "An appointment starting at {} and lasting {} minutes would end after midnight",
                format_time(start),
                minutes
            ))
        })
}

/// A half-open `[start, end)` span of minutes within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(minute_of_day(start), minute_of_day(end))
    }

    /// `[s1, e1)` and `[s2, e2)` overlap iff `s1 < e2 && e1 > s2`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Serde adapter for `NaiveTime` fields rendered as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

/// Same as [`hhmm`] for optional fields.
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => serializer.serialize_str(&super::format_time(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse_time(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
