use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use salon_core::{
    errors::SalonError,
    models::service::{
        CreateServiceRequest, Service, ServiceListResponse, ServiceResponse, UpdateServiceRequest,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::error_handling::{AppError, AppJson},
    ApiState,
};

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ServiceListResponse>, AppError> {
    let services = salon_db::repositories::service::list_services(&state.db_pool)
        .await
        .map_err(SalonError::Database)?
        .into_iter()
        .map(Service::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ServiceListResponse { services }))
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), AppError> {
    payload.validate()?;

    let db_service = salon_db::repositories::service::create_service(&state.db_pool, &payload)
        .await
        .map_err(SalonError::Database)?;
    let service = Service::try_from(db_service)?;

    tracing::info!("Service {} created: {}", service.id, service.name);
    Ok((StatusCode::CREATED, Json(ServiceResponse { service })))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    payload.validate()?;

    let db_service = salon_db::repositories::service::update_service(&state.db_pool, id, &payload)
        .await
        .map_err(SalonError::Database)?
        .ok_or_else(|| SalonError::NotFound(format!("Service with ID {} not found", id)))?;

    Ok(Json(ServiceResponse {
        service: Service::try_from(db_service)?,
    }))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = salon_db::repositories::service::delete_service(&state.db_pool, id)
        .await
        .map_err(SalonError::Database)?;

    if !deleted {
        return Err(AppError(SalonError::NotFound(format!(
            "Service with ID {} not found",
            id
        ))));
    }

    tracing::info!("Service {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
