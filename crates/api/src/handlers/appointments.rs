//! # Appointment Handlers
//!
//! Booking, listing and status changes for the three roles. Every write that
//! can occupy a barber's time goes through `salon_db`'s transactional slot
//! guard; status changes follow [`AppointmentStatus::transition_to`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, NaiveDateTime};
use salon_core::{
    booking::client_cancellation,
    errors::{SalonError, SalonResult},
    models::{
        appointment::{
            Appointment, AppointmentDetails, AppointmentListResponse, AppointmentResponse,
            AppointmentStatus, BookAppointmentRequest, CreateAppointmentRequest,
            UpdateAppointmentRequest, UpdateStatusRequest,
        },
        service::Service,
    },
    time::{self, minute_of_day},
};
use salon_db::repositories::appointment::{AppointmentChanges, AppointmentFilter, NewAppointment};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        auth::Session,
        error_handling::{AppError, AppJson, AppQuery},
    },
    ApiState,
};

#[derive(Debug, Default, Deserialize)]
pub struct BarberAppointmentsQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminAppointmentsQuery {
    pub barber_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

async fn list(state: &ApiState, filter: AppointmentFilter) -> Result<AppointmentListResponse, AppError> {
    let appointments = salon_db::repositories::appointment::list_appointments(&state.db_pool, filter)
        .await
        .map_err(SalonError::Database)?
        .into_iter()
        .map(AppointmentDetails::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AppointmentListResponse { appointments })
}

async fn details(state: &ApiState, id: Uuid) -> Result<AppointmentResponse, AppError> {
    let appointment = salon_db::repositories::appointment::get_appointment_details(&state.db_pool, id)
        .await
        .map_err(SalonError::Database)?
        .ok_or_else(|| SalonError::NotFound(format!("Appointment with ID {} not found", id)))?;

    Ok(AppointmentResponse {
        appointment: appointment.try_into()?,
    })
}

async fn load_service(state: &ApiState, service_id: Uuid) -> Result<Service, AppError> {
    let service = salon_db::repositories::service::get_service_by_id(&state.db_pool, service_id)
        .await
        .map_err(SalonError::Database)?
        .ok_or_else(|| SalonError::NotFound(format!("Service with ID {} not found", service_id)))?;

    Ok(Service::try_from(service)?)
}

async fn ensure_barber(state: &ApiState, barber_id: Uuid) -> Result<(), AppError> {
    salon_db::repositories::barber::get_barber_by_id(&state.db_pool, barber_id)
        .await
        .map_err(SalonError::Database)?
        .ok_or_else(|| SalonError::NotFound(format!("Barber with ID {} not found", barber_id)))?;
    Ok(())
}

/// Rejects start times that are not after the salon's current time.
pub fn ensure_future(date: NaiveDate, start: chrono::NaiveTime, now: NaiveDateTime) -> SalonResult<()> {
    if date.and_time(start) <= now {
        return Err(SalonError::Validation(
            "Cannot book an appointment in the past".to_string(),
        ));
    }
    Ok(())
}

/// Works out the fields of an admin edit from the stored appointment.
///
/// A new start without a new end keeps the appointment's length. A status
/// other than the current one must be a legal transition.
pub fn plan_admin_update(
    current: &Appointment,
    payload: &UpdateAppointmentRequest,
) -> SalonResult<AppointmentChanges> {
    let mut changes = AppointmentChanges::from(current);

    if let Some(status) = payload.status {
        if status != current.status {
            changes.status = current.status.transition_to(status)?;
        }
    }
    if let Some(notes) = &payload.notes {
        changes.notes = Some(notes.clone());
    }

    if payload.reschedules() {
        if current.status.is_terminal() {
            return Err(SalonError::Validation(format!(
                "Cannot reschedule a {} appointment",
                current.status
            )));
        }
        changes.date = payload.date.unwrap_or(current.date);
        changes.start_time = payload.start_time.unwrap_or(current.start_time);
        changes.end_time = match (payload.start_time, payload.end_time) {
            (_, Some(end)) => end,
            (Some(start), None) => {
                let length = minute_of_day(current.end_time) - minute_of_day(current.start_time);
                time::add_minutes(start, length)?
            }
            (None, None) => current.end_time,
        };
    }

    Ok(changes)
}

// Client

#[axum::debug_handler]
pub async fn list_client_appointments(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<AppointmentListResponse>, AppError> {
    let client_id = session.profile()?;
    let filter = AppointmentFilter {
        client_id: Some(client_id),
        ..Default::default()
    };
    Ok(Json(list(&state, filter).await?))
}

/// Books a pending appointment for the calling client. The end time follows
/// from the service's duration.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
    AppJson(payload): AppJson<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let client_id = session.profile()?;

    ensure_barber(&state, payload.barber_id).await?;
    let service = load_service(&state, payload.service_id).await?;
    let end_time = time::add_minutes(payload.start_time, service.duration_minutes)?;
    ensure_future(payload.date, payload.start_time, state.salon_now())?;

    let appointment = salon_db::repositories::appointment::create_appointment(
        &state.db_pool,
        &NewAppointment {
            barber_id: payload.barber_id,
            client_id,
            service_id: service.id,
            date: payload.date,
            start_time: payload.start_time,
            end_time,
            status: AppointmentStatus::Pending,
            notes: payload.notes,
        },
    )
    .await?;

    tracing::info!(
        "Client {} booked appointment {} with barber {}",
        client_id, appointment.id, appointment.barber_id
    );
    Ok((StatusCode::CREATED, Json(details(&state, appointment.id).await?)))
}

/// Cancels one of the caller's own appointments, no later than the cutoff
/// before it starts.
#[axum::debug_handler]
pub async fn cancel_client_appointment(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let client_id = session.profile()?;
    let now = state.salon_now();

    salon_db::repositories::appointment::update_appointment(&state.db_pool, id, move |current| {
        if current.client_id != client_id {
            return Err(SalonError::Authorization(
                "You can only cancel your own appointments".to_string(),
            ));
        }
        let status = client_cancellation(current.status, current.starts_at(), now)?;
        Ok(AppointmentChanges {
            status,
            ..AppointmentChanges::from(current)
        })
    })
    .await?;

    tracing::info!("Client {} canceled appointment {}", client_id, id);
    Ok(Json(details(&state, id).await?))
}

// Barber

#[axum::debug_handler]
pub async fn list_barber_appointments(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
    AppQuery(query): AppQuery<BarberAppointmentsQuery>,
) -> Result<Json<AppointmentListResponse>, AppError> {
    let barber_id = session.profile()?;
    let filter = AppointmentFilter {
        barber_id: Some(barber_id),
        date: query.date,
        ..Default::default()
    };
    Ok(Json(list(&state, filter).await?))
}

#[axum::debug_handler]
pub async fn update_barber_appointment_status(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let barber_id = session.profile()?;
    let next = payload.status;

    salon_db::repositories::appointment::update_appointment(&state.db_pool, id, move |current| {
        if current.barber_id != barber_id {
            return Err(SalonError::Authorization(
                "You can only update your own appointments".to_string(),
            ));
        }
        Ok(AppointmentChanges {
            status: current.status.transition_to(next)?,
            ..AppointmentChanges::from(current)
        })
    })
    .await?;

    tracing::info!("Barber {} set appointment {} to {}", barber_id, id, next);
    Ok(Json(details(&state, id).await?))
}

// Admin

#[axum::debug_handler]
pub async fn list_all_appointments(
    State(state): State<Arc<ApiState>>,
    AppQuery(query): AppQuery<AdminAppointmentsQuery>,
) -> Result<Json<AppointmentListResponse>, AppError> {
    let filter = AppointmentFilter {
        barber_id: query.barber_id,
        date: query.date,
        ..Default::default()
    };
    Ok(Json(list(&state, filter).await?))
}

/// Creates an appointment on behalf of a client. The status may start as
/// `pending` (default) or `confirmed`.
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let status = payload.status.unwrap_or(AppointmentStatus::Pending);
    if !matches!(status, AppointmentStatus::Pending | AppointmentStatus::Confirmed) {
        return Err(AppError(SalonError::Validation(format!(
            "New appointments cannot start as {}",
            status
        ))));
    }

    ensure_barber(&state, payload.barber_id).await?;
    salon_db::repositories::client::get_client_by_id(&state.db_pool, payload.client_id)
        .await
        .map_err(SalonError::Database)?
        .ok_or_else(|| {
            SalonError::NotFound(format!("Client with ID {} not found", payload.client_id))
        })?;
    let service = load_service(&state, payload.service_id).await?;

    let end_time = match payload.end_time {
        Some(end) => end,
        None => time::add_minutes(payload.start_time, service.duration_minutes)?,
    };

    let appointment = salon_db::repositories::appointment::create_appointment(
        &state.db_pool,
        &NewAppointment {
            barber_id: payload.barber_id,
            client_id: payload.client_id,
            service_id: service.id,
            date: payload.date,
            start_time: payload.start_time,
            end_time,
            status,
            notes: payload.notes,
        },
    )
    .await?;

    tracing::info!("Admin created appointment {}", appointment.id);
    Ok((StatusCode::CREATED, Json(details(&state, appointment.id).await?)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    salon_db::repositories::appointment::update_appointment(&state.db_pool, id, |current| {
        plan_admin_update(current, &payload)
    })
    .await?;

    Ok(Json(details(&state, id).await?))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = salon_db::repositories::appointment::delete_appointment(&state.db_pool, id)
        .await
        .map_err(SalonError::Database)?;

    if !deleted {
        return Err(AppError(SalonError::NotFound(format!(
            "Appointment with ID {} not found",
            id
        ))));
    }

    tracing::info!("Appointment {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
