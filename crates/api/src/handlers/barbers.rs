use axum::{
    extract::{Path, State},
    Extension, Json,
};
use salon_core::{
    errors::SalonError,
    models::barber::{Barber, BarberListResponse, BarberResponse, UpdateScheduleRequest},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        auth::Session,
        error_handling::{AppError, AppJson},
    },
    ApiState,
};

/// Lists every barber with their schedule, ordered by name.
#[axum::debug_handler]
pub async fn list_barbers(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<BarberListResponse>, AppError> {
    let barbers = salon_db::repositories::barber::list_barbers(&state.db_pool)
        .await
        .map_err(SalonError::Database)?
        .into_iter()
        .map(Barber::from)
        .collect();

    Ok(Json(BarberListResponse { barbers }))
}

#[axum::debug_handler]
pub async fn get_own_schedule(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<BarberResponse>, AppError> {
    let barber_id = session.profile()?;

    let db_barber = salon_db::repositories::barber::get_barber_by_id(&state.db_pool, barber_id)
        .await
        .map_err(SalonError::Database)?
        .ok_or_else(|| SalonError::NotFound(format!("Barber with ID {} not found", barber_id)))?;

    Ok(Json(BarberResponse {
        barber: Barber::from(db_barber),
    }))
}

#[axum::debug_handler]
pub async fn update_own_schedule(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
    AppJson(payload): AppJson<UpdateScheduleRequest>,
) -> Result<Json<BarberResponse>, AppError> {
    let barber_id = session.profile()?;
    let barber = apply_schedule_update(&state, barber_id, payload).await?;
    Ok(Json(BarberResponse { barber }))
}

/// Admin edit of any barber's schedule.
#[axum::debug_handler]
pub async fn update_barber(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateScheduleRequest>,
) -> Result<Json<BarberResponse>, AppError> {
    let barber = apply_schedule_update(&state, id, payload).await?;
    Ok(Json(BarberResponse { barber }))
}

async fn apply_schedule_update(
    state: &ApiState,
    barber_id: Uuid,
    payload: UpdateScheduleRequest,
) -> Result<Barber, AppError> {
    let not_found = || SalonError::NotFound(format!("Barber with ID {} not found", barber_id));

    let current = salon_db::repositories::barber::get_barber_by_id(&state.db_pool, barber_id)
        .await
        .map_err(SalonError::Database)?
        .ok_or_else(not_found)?;

    let schedule = payload.apply(current.schedule());

    let updated =
        salon_db::repositories::barber::update_barber_schedule(&state.db_pool, barber_id, &schedule)
            .await
            .map_err(SalonError::Database)?
            .ok_or_else(not_found)?;

    tracing::info!("Schedule of barber {} updated", barber_id);
    Ok(Barber::from(updated))
}
