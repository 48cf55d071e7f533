//! # Authentication Module
//!
//! Password hashing for user accounts and the session middleware that guards
//! the role-specific route groups.
//!
//! Passwords are stored as Argon2 PHC strings. After login the fronting
//! gateway sends the user id in the [`USER_ID_HEADER`] header on every
//! request; [`authorize`] resolves it into a [`Session`] once and inserts it
//! as a request extension for the handlers.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use eyre::Result;
use salon_core::{
    errors::{SalonError, SalonResult},
    models::user::Role,
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller of a role-gated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
    /// Barber id for barbers, client id for clients, `None` for admins.
    pub profile_id: Option<Uuid>,
}

impl Session {
    /// The barber or client id of the caller.
    pub fn profile(&self) -> SalonResult<Uuid> {
        self.profile_id.ok_or_else(|| {
            SalonError::Authorization(format!("No {} profile for this user", self.role))
        })
    }
}

/// Hashes a password using the Argon2 algorithm
///
/// Generates a fresh random salt and returns the PHC string, which carries
/// the algorithm, parameters and salt along with the hash.
///
/// # Example
///
/// ```rust
/// # use salon_api::middleware::auth::{hash_password, verify_password};
/// let hashed = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hashed));
/// # Ok::<(), eyre::Report>(())
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC string. A hash that cannot be
/// parsed never matches.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

/// Reads the caller's user id from the request headers.
pub fn session_user_id(headers: &HeaderMap) -> SalonResult<Uuid> {
    let value = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| SalonError::Authentication("Not signed in".to_string()))?;

    value
        .to_str()
        .ok()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .ok_or_else(|| SalonError::Authentication("Invalid session".to_string()))
}

/// Resolves the session and admits the request only for `role`.
///
/// The header is checked before the store is touched, so anonymous requests
/// are rejected without a database round trip.
pub async fn authorize(
    state: &ApiState,
    mut req: Request,
    next: Next,
    role: Role,
) -> Result<Response, AppError> {
    let user_id = session_user_id(req.headers())?;

    let user = salon_db::repositories::user::get_user_by_id(&state.db_pool, user_id)
        .await
        .map_err(SalonError::Database)?
        .ok_or_else(|| SalonError::Authentication("Invalid session".to_string()))?;
    let user_role: Role = user.role.parse()?;

    if user_role != role {
        tracing::debug!("User {} ({}) denied access to {} route", user_id, user_role, role);
        return Err(AppError(SalonError::Authorization(format!(
            "This action requires the {} role",
            role
        ))));
    }

    let profile_id = match role {
        Role::Admin => None,
        Role::Barber => salon_db::repositories::barber::get_barber_by_user_id(&state.db_pool, user_id)
            .await
            .map_err(SalonError::Database)?
            .map(|barber| barber.id),
        Role::Client => salon_db::repositories::client::get_client_by_user_id(&state.db_pool, user_id)
            .await
            .map_err(SalonError::Database)?
            .map(|client| client.id),
    };

    req.extensions_mut().insert(Session {
        user_id,
        role,
        profile_id,
    });

    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, req, next, Role::Admin).await
}

pub async fn require_barber(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, req, next, Role::Barber).await
}

pub async fn require_client(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, req, next, Role::Client).await
}
