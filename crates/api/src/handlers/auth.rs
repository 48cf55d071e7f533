use axum::{extract::State, Json};
use salon_core::{
    errors::SalonError,
    models::user::{LoginRequest, LoginResponse, User},
};
use std::sync::Arc;

use crate::{
    middleware::{
        auth,
        error_handling::{AppError, AppJson},
    },
    ApiState,
};

/// Signs a user in with email and password.
///
/// Unknown emails and wrong passwords produce the same error.
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError(SalonError::Validation(
            "Email and password are required".to_string(),
        )));
    }

    let invalid = || SalonError::Authentication("Invalid email or password".to_string());

    let db_user = salon_db::repositories::user::get_user_by_email(&state.db_pool, payload.email.trim())
        .await
        .map_err(SalonError::Database)?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&payload.password, &db_user.password_hash) {
        tracing::debug!("Failed login for user {}", db_user.id);
        return Err(AppError(invalid()));
    }

    let user = User::try_from(db_user)?;
    tracing::info!("User {} signed in as {}", user.id, user.role);

    Ok(Json(LoginResponse { user }))
}
