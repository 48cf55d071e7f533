//! Aggregate figures for the admin and barber dashboards.
//!
//! Callers pass the non-canceled appointments since the period start, one
//! [`StatsRow`] each; everything here is plain counting.

use std::{collections::BTreeMap, str::FromStr};

use chrono::{Duration, Months, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{SalonError, SalonResult},
    models::stats::{BarberStats, HourCount, NamedCount, SalonStats},
};

const UNKNOWN: &str = "Unknown";
const PEAK_HOURS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Day,
    Week,
    #[default]
    Month,
}

impl StatsPeriod {
    /// First date included in the period ending today.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => today,
            Self::Week => today - Duration::days(7),
            Self::Month => today
                .checked_sub_months(Months::new(1))
                .unwrap_or(NaiveDate::MIN),
        }
    }
}

impl FromStr for StatsPeriod {
    type Err = SalonError;

    fn from_str(s: &str) -> SalonResult<Self> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(SalonError::Validation(format!(
                "Unknown period '{}', expected day, week or month",
                other
            ))),
        }
    }
}

/// One counted appointment with the joined names and price.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRow {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub barber_name: Option<String>,
    pub service_name: Option<String>,
    pub service_price: Option<f64>,
}

pub fn salon_stats(rows: &[StatsRow], total_clients: i64, total_barbers: i64) -> SalonStats {
    let mut hours: BTreeMap<u32, usize> = BTreeMap::new();
    for row in rows {
        *hours.entry(row.start_time.hour()).or_default() += 1;
    }
    let mut peak_hours: Vec<HourCount> = hours
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect();
    // Stable sort keeps earlier hours first among equals.
    peak_hours.sort_by(|a, b| b.count.cmp(&a.count));
    peak_hours.truncate(PEAK_HOURS);

    SalonStats {
        total_appointments: rows.len(),
        total_revenue: revenue(rows),
        total_clients,
        total_barbers,
        most_booked_barber: most_frequent(rows.iter().map(|row| row.barber_name.as_deref())),
        most_popular_service: most_frequent(rows.iter().map(|row| row.service_name.as_deref())),
        peak_hours,
        appointments_by_day: by_day(rows),
    }
}

pub fn barber_stats(rows: &[StatsRow]) -> BarberStats {
    BarberStats {
        total_appointments: rows.len(),
        total_revenue: revenue(rows),
        most_selected_service: most_frequent(rows.iter().map(|row| row.service_name.as_deref())),
        appointments_by_day: by_day(rows),
    }
}

fn revenue(rows: &[StatsRow]) -> f64 {
    rows.iter().filter_map(|row| row.service_price).sum()
}

fn by_day(rows: &[StatsRow]) -> BTreeMap<NaiveDate, usize> {
    let mut days = BTreeMap::new();
    for row in rows {
        *days.entry(row.date).or_default() += 1;
    }
    days
}

/// Highest count wins; ties go to the alphabetically first name.
fn most_frequent<'a>(names: impl Iterator<Item = Option<&'a str>>) -> Option<NamedCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in names {
        *counts.entry(name.unwrap_or(UNKNOWN)).or_default() += 1;
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(&str, usize)>, (name, count)| match best {
            Some((_, top)) if top >= count => best,
            _ => Some((name, count)),
        })
        .map(|(name, count)| NamedCount {
            name: name.to_string(),
            count,
        })
}
