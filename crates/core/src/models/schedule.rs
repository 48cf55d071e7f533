//! Barber availability: a weekly open/closed template, one-off blocked dates
//! and recurring break intervals.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    errors::{SalonError, SalonResult},
    time::{self, Interval},
};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Lowercase English day name used as the key of stored weekly hours.
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Opening hours for one day. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct OpenHours {
    #[serde(with = "time::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "time::hhmm")]
    pub end: NaiveTime,
}

impl OpenHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> SalonResult<Self> {
        if start >= end {
            return Err(SalonError::Validation(format!(
                "Opening time {} must be before closing time {}",
                time::format_time(start),
                time::format_time(end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn interval(&self) -> Interval {
        Interval::from_times(self.start, self.end)
    }
}

/// A recurring pause within every open day, e.g. lunch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct BreakInterval {
    #[serde(with = "time::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "time::hhmm")]
    pub end: NaiveTime,
}

impl BreakInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> SalonResult<Self> {
        if start >= end {
            return Err(SalonError::Validation(format!(
                "Break start {} must be before break end {}",
                time::format_time(start),
                time::format_time(end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn interval(&self) -> Interval {
        Interval::from_times(self.start, self.end)
    }
}

#[derive(Deserialize)]
struct RawSpan {
    #[serde(with = "time::hhmm")]
    start: NaiveTime,
    #[serde(with = "time::hhmm")]
    end: NaiveTime,
}

impl TryFrom<RawSpan> for OpenHours {
    type Error = SalonError;

    fn try_from(raw: RawSpan) -> SalonResult<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl TryFrom<RawSpan> for BreakInterval {
    type Error = SalonError;

    fn try_from(raw: RawSpan) -> SalonResult<Self> {
        Self::new(raw.start, raw.end)
    }
}

/// Availability of a barber on one calendar day once overrides are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayAvailability {
    Closed,
    Open(OpenHours),
}

/// Per-weekday template, stored as `{"monday": {"start": "09:00", "end": "18:00"}, "sunday": null, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WeeklyHoursDoc", into = "WeeklyHoursDoc")]
pub struct WeeklySchedule {
    days: [Option<OpenHours>; 7],
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WeeklyHoursDoc {
    #[serde(default)]
    monday: Option<OpenHours>,
    #[serde(default)]
    tuesday: Option<OpenHours>,
    #[serde(default)]
    wednesday: Option<OpenHours>,
    #[serde(default)]
    thursday: Option<OpenHours>,
    #[serde(default)]
    friday: Option<OpenHours>,
    #[serde(default)]
    saturday: Option<OpenHours>,
    #[serde(default)]
    sunday: Option<OpenHours>,
}

impl From<WeeklyHoursDoc> for WeeklySchedule {
    fn from(doc: WeeklyHoursDoc) -> Self {
        Self {
            days: [
                doc.monday,
                doc.tuesday,
                doc.wednesday,
                doc.thursday,
                doc.friday,
                doc.saturday,
                doc.sunday,
            ],
        }
    }
}

impl From<WeeklySchedule> for WeeklyHoursDoc {
    fn from(schedule: WeeklySchedule) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = schedule.days;
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
    }
}

impl WeeklySchedule {
    /// Every day closed.
    pub fn closed() -> Self {
        Self { days: [None; 7] }
    }

    /// Template given to a newly created barber: weekdays 09:00-18:00,
    /// Saturday 09:00-16:00, Sunday closed.
    pub fn default_template() -> Self {
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
        let weekday = Some(OpenHours {
            start: at(9),
            end: at(18),
        });
        let saturday = Some(OpenHours {
            start: at(9),
            end: at(16),
        });
        Self {
            days: [weekday, weekday, weekday, weekday, weekday, saturday, None],
        }
    }

    pub fn with_day(mut self, day: Weekday, hours: Option<OpenHours>) -> Self {
        self.days[day.num_days_from_monday() as usize] = hours;
        self
    }

    pub fn hours_for(&self, day: Weekday) -> DayAvailability {
        match self.days[day.num_days_from_monday() as usize] {
            Some(hours) => DayAvailability::Open(hours),
            None => DayAvailability::Closed,
        }
    }

    /// Reads weekly hours as persisted. Anything missing or malformed for a
    /// day closes that day; nothing is ever synthesized. Returns the schedule
    /// together with the names of the days whose entries had to be discarded.
    pub fn from_stored(value: &Value) -> (Self, Vec<&'static str>) {
        let mut schedule = Self::closed();
        let mut discarded = Vec::new();
        let Some(entries) = value.as_object() else {
            if !value.is_null() {
                discarded.extend(WEEK.iter().map(|day| weekday_key(*day)));
            }
            return (schedule, discarded);
        };

        for day in WEEK {
            let key = weekday_key(day);
            match entries.get(key) {
                None | Some(Value::Null) => {}
                Some(entry) => match serde_json::from_value::<OpenHours>(entry.clone()) {
                    Ok(hours) => schedule = schedule.with_day(day, Some(hours)),
                    Err(_) => discarded.push(key),
                },
            }
        }
        (schedule, discarded)
    }
}

/// Calendar dates on which the barber does not work at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockedDates(BTreeSet<NaiveDate>);

impl BlockedDates {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self(dates.into_iter().collect())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.0.iter()
    }

    /// Reads a stored `["YYYY-MM-DD", ...]` list, skipping unreadable entries.
    pub fn from_stored(value: &Value) -> Self {
        let dates = value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|raw| time::parse_date(raw).ok())
                    .collect()
            })
            .unwrap_or_default();
        Self(dates)
    }
}

/// Reads stored break intervals, skipping unreadable entries.
pub fn breaks_from_stored(value: &Value) -> Vec<BreakInterval> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Everything that decides when a single barber can take work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarberSchedule {
    pub working_hours: WeeklySchedule,
    #[serde(default)]
    pub break_times: Vec<BreakInterval>,
    #[serde(default)]
    pub blocked_days: BlockedDates,
}

impl BarberSchedule {
    pub fn new(working_hours: WeeklySchedule) -> Self {
        Self {
            working_hours,
            break_times: Vec::new(),
            blocked_days: BlockedDates::default(),
        }
    }

    /// Blocked dates win over the weekly template. The weekday comes from
    /// the calendar date alone, so no time zone can shift it.
    pub fn availability_on(&self, date: NaiveDate) -> DayAvailability {
        if self.blocked_days.contains(date) {
            return DayAvailability::Closed;
        }
        self.working_hours.hours_for(date.weekday())
    }

    pub fn break_intervals(&self) -> Vec<Interval> {
        self.break_times.iter().map(BreakInterval::interval).collect()
    }
}
