//! Write-path guards for appointments.
//!
//! [`validate_no_overlap`] uses the same half-open overlap rule as the slot
//! generator, so a start time offered by [`compute_available_slots`] is
//! always accepted here unless someone else booked it in the meantime.
//!
//! [`compute_available_slots`]: crate::availability::compute_available_slots

use chrono::{Duration, NaiveDateTime};

use crate::{
    errors::{SalonError, SalonResult},
    models::appointment::{AppointmentStatus, ProposedSlot},
    time::{self, Interval},
};

/// How long before the start a client may still cancel on their own.
pub const CLIENT_CANCELLATION_CUTOFF_HOURS: i64 = 2;

/// Rejects `proposed` when it overlaps any of `existing`, which must hold the
/// barber's non-canceled appointments on the proposed date.
pub fn validate_no_overlap(proposed: &ProposedSlot, existing: &[Interval]) -> SalonResult<()> {
    let wanted = proposed.interval();
    match existing.iter().find(|taken| wanted.overlaps(taken)) {
        Some(_) => Err(SalonError::SchedulingConflict(format!(
            "Slot already booked: {} {}-{}",
            proposed.date,
            time::format_time(proposed.start_time),
            time::format_time(proposed.end_time)
        ))),
        None => Ok(()),
    }
}

/// Checks a client's request to cancel their own appointment and returns
/// the status to store.
///
/// The appointment has to be cancelable at all, and the client has to ask at
/// least [`CLIENT_CANCELLATION_CUTOFF_HOURS`] before it starts.
pub fn client_cancellation(
    current: AppointmentStatus,
    starts_at: NaiveDateTime,
    now: NaiveDateTime,
) -> SalonResult<AppointmentStatus> {
    let next = current.transition_to(AppointmentStatus::Canceled)?;
    if starts_at - now < Duration::hours(CLIENT_CANCELLATION_CUTOFF_HOURS) {
        return Err(SalonError::TooLateToCancel(format!(
            "Cannot cancel an appointment less than {} hours before it starts",
            CLIENT_CANCELLATION_CUTOFF_HOURS
        )));
    }
    Ok(next)
}
