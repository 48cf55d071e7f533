//! # Slot generation
//!
//! Produces the start times a client may pick for a service with a given
//! barber on a given date. Candidates are laid out every
//! [`SLOT_STEP_MINUTES`](crate::time::SLOT_STEP_MINUTES) from opening time;
//! a candidate `t` survives when
//!
//! 1. `t + duration` does not run past closing time,
//! 2. `[t, t + duration)` overlaps neither an existing non-canceled
//!    appointment nor a break, and
//! 3. when the date is today, `t` is strictly later than the current minute.
//!
//! The computation is pure: callers fetch the schedule and the booked
//! intervals and supply the salon's current local time.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    errors::SalonResult,
    models::schedule::{BarberSchedule, DayAvailability},
    time::{self, Interval, SLOT_STEP_MINUTES},
};

/// Computes the bookable start times, ascending.
///
/// `booked` must hold only the barber's non-canceled appointments on `date`.
pub fn compute_available_slots(
    schedule: &BarberSchedule,
    date: NaiveDate,
    duration_minutes: u32,
    booked: &[Interval],
    now: NaiveDateTime,
) -> SalonResult<Vec<NaiveTime>> {
    time::validate_duration(duration_minutes)?;

    let hours = match schedule.availability_on(date) {
        DayAvailability::Closed => return Ok(Vec::new()),
        DayAvailability::Open(hours) => hours.interval(),
    };
    debug_assert!(hours.end < time::MINUTES_PER_DAY);

    let mut busy: Vec<Interval> = booked.to_vec();
    busy.extend(schedule.break_intervals());

    let not_after = (date == now.date()).then(|| time::minute_of_day(now.time()));

    let slots = (hours.start..hours.end)
        .step_by(SLOT_STEP_MINUTES as usize)
        .filter(|&start| {
            let Some(end) = start.checked_add(duration_minutes) else {
                return false;
            };
            let candidate = Interval::new(start, end);
            candidate.end <= hours.end
                && !busy.iter().any(|taken| candidate.overlaps(taken))
                && not_after.is_none_or(|current| start > current)
        })
        // Open hours end before midnight, so every start converts.
        .filter_map(time::time_from_minutes)
        .collect();

    Ok(slots)
}

/// Renders slots the way the booking UI consumes them.
pub fn format_slots(slots: &[NaiveTime]) -> Vec<String> {
    slots.iter().copied().map(time::format_time).collect()
}
