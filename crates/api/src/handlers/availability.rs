//! # Availability Handlers
//!
//! Serves the bookable start times of a barber on one date. The handler only
//! gathers inputs (schedule, service duration, booked intervals and the
//! salon clock); the slot rules live in
//! [`salon_core::availability::compute_available_slots`].

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, NaiveDateTime};
use salon_core::{
    availability::{compute_available_slots, format_slots},
    errors::{SalonError, SalonResult},
    models::{appointment::AvailableSlotsResponse, schedule::BarberSchedule, service::Service},
    time::{self, Interval, DEFAULT_SERVICE_DURATION_MINUTES},
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::error_handling::{AppError, AppQuery},
    ApiState,
};

/// Query parameters for the available slots endpoint
///
/// * `date` - Target date, `YYYY-MM-DD` (required)
/// * `duration` - Service length in minutes; wins over `service_id`
/// * `service_id` - Service whose duration to use when `duration` is absent
#[derive(Debug, Default, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
    pub duration: Option<u32>,
    pub service_id: Option<Uuid>,
}

impl SlotsQuery {
    pub fn target_date(&self) -> SalonResult<NaiveDate> {
        match self.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => time::parse_date(raw),
            _ => Err(SalonError::Validation("date is required".to_string())),
        }
    }
}

/// Lists the start times at which a service of the requested length can be
/// booked with the barber.
///
/// # Endpoint
///
/// ```text
/// GET /api/barbers/:id/available-slots?date=2024-03-04&duration=30
/// GET /api/barbers/:id/available-slots?date=2024-03-04&service_id=<uuid>
/// ```
///
/// Without `duration` or `service_id` a 30 minute service is assumed.
///
/// # Errors
///
/// * `SalonError::Validation` - Missing or malformed date, duration of zero or over a day
/// * `SalonError::NotFound` - Unknown barber or service
/// * `SalonError::Database` - Database error
#[axum::debug_handler]
pub async fn available_slots(
    State(state): State<Arc<ApiState>>,
    Path(barber_id): Path<Uuid>,
    AppQuery(query): AppQuery<SlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let date = query.target_date()?;
    if let Some(minutes) = query.duration {
        time::validate_duration(minutes)?;
    }

    let barber = salon_db::repositories::barber::get_barber_by_id(&state.db_pool, barber_id)
        .await
        .map_err(SalonError::Database)?
        .ok_or_else(|| SalonError::NotFound(format!("Barber with ID {} not found", barber_id)))?;

    let duration = match (query.duration, query.service_id) {
        (Some(minutes), _) => minutes,
        (None, Some(service_id)) => {
            let service = salon_db::repositories::service::get_service_by_id(&state.db_pool, service_id)
                .await
                .map_err(SalonError::Database)?
                .ok_or_else(|| {
                    SalonError::NotFound(format!("Service with ID {} not found", service_id))
                })?;
            Service::try_from(service)?.duration_minutes
        }
        (None, None) => DEFAULT_SERVICE_DURATION_MINUTES,
    };

    let booked = salon_db::repositories::appointment::get_active_intervals(&state.db_pool, barber_id, date)
        .await
        .map_err(SalonError::Database)?;

    let slots = slots_for(&barber.schedule(), date, duration, &booked, state.salon_now())?;
    Ok(Json(AvailableSlotsResponse { slots }))
}

/// Formats the available slots as `HH:MM` strings.
pub fn slots_for(
    schedule: &BarberSchedule,
    date: NaiveDate,
    duration: u32,
    booked: &[Interval],
    now: NaiveDateTime,
) -> SalonResult<Vec<String>> {
    let slots = compute_available_slots(schedule, date, duration, booked, now)?;
    tracing::debug!("{} slots available on {} for {} minutes", slots.len(), date, duration);
    Ok(format_slots(&slots))
}
