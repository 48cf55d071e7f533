use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use salon_core::{
    errors::SalonError,
    models::user::{CreateUserRequest, UpdateUserRequest, User, UserListResponse, UserResponse},
};
use salon_db::repositories::user::NewUser;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        auth,
        error_handling::{AppError, AppJson},
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = salon_db::repositories::user::list_users(&state.db_pool)
        .await
        .map_err(SalonError::Database)?
        .into_iter()
        .map(User::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(UserListResponse { users }))
}

/// Creates an account. Barbers start with the default weekly template,
/// clients with no loyalty points.
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let role = payload.validate()?;
    let password_hash = auth::hash_password(&payload.password)?;

    let db_user = salon_db::repositories::user::create_user(
        &state.db_pool,
        NewUser {
            name: payload.name.trim(),
            email: payload.email.trim(),
            password_hash: &password_hash,
            phone: payload.phone.as_deref(),
            role,
        },
    )
    .await?;
    let user = User::try_from(db_user)?;

    tracing::info!("User {} created with role {}", user.id, user.role);
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if payload.name.as_deref().is_some_and(|name| name.trim().is_empty())
        || payload.email.as_deref().is_some_and(|email| email.trim().is_empty())
    {
        return Err(AppError(SalonError::Validation(
            "Name and email cannot be empty".to_string(),
        )));
    }

    let db_user = salon_db::repositories::user::update_user(
        &state.db_pool,
        id,
        payload.name.as_deref().map(str::trim),
        payload.email.as_deref().map(str::trim),
        payload.phone.as_deref(),
        payload.role,
    )
    .await?
    .ok_or_else(|| SalonError::NotFound(format!("User with ID {} not found", id)))?;

    Ok(Json(UserResponse {
        user: User::try_from(db_user)?,
    }))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = salon_db::repositories::user::delete_user(&state.db_pool, id)
        .await
        .map_err(SalonError::Database)?;

    if !deleted {
        return Err(AppError(SalonError::NotFound(format!(
            "User with ID {} not found",
            id
        ))));
    }

    tracing::info!("User {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
