//! # Error Handling Middleware
//!
//! Maps [`SalonError`] values to HTTP status codes and JSON error bodies so
//! every endpoint reports failures the same way:
//!
//! ```json
//! { "error": "Scheduling conflict: Slot already booked: 2024-03-04 10:00-10:30" }
//! ```
//!
//! | Error                 | Status |
//! |-----------------------|--------|
//! | `NotFound`            | 404    |
//! | `Validation`          | 400    |
//! | `SchedulingConflict`  | 409    |
//! | `TooLateToCancel`     | 400    |
//! | `InvalidTransition`   | 409    |
//! | `Authentication`      | 401    |
//! | `Authorization`       | 403    |
//! | `Database`/`Internal` | 500    |

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use salon_core::errors::SalonError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use salon_api::middleware::error_handling::AppError;
/// use salon_core::errors::SalonError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(SalonError::NotFound("Barber not found".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub SalonError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SalonError::NotFound(_) => StatusCode::NOT_FOUND,
            SalonError::Validation(_) => StatusCode::BAD_REQUEST,
            SalonError::SchedulingConflict(_) => StatusCode::CONFLICT,
            SalonError::TooLateToCancel(_) => StatusCode::BAD_REQUEST,
            SalonError::InvalidTransition { .. } => StatusCode::CONFLICT,
            SalonError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SalonError::Authorization(_) => StatusCode::FORBIDDEN,
            SalonError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SalonError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store failures are logged in full but reported generically.
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
            match &self.0 {
                SalonError::Database(_) => "Database error".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.0.to_string()
        };
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<SalonError> for AppError {
    fn from(err: SalonError) -> Self {
        AppError(err)
    }
}

/// Wraps store failures reported through `eyre` as `SalonError::Database`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SalonError::Database(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(SalonError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(SalonError::Validation(rejection.body_text()))
    }
}

/// `Json` extractor whose rejections are reported as validation errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` extractor whose rejections are reported as validation errors.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Maps a SalonError to an HTTP response
///
/// For handlers that build responses by hand instead of returning
/// `Result<_, AppError>`.
pub fn map_error(err: SalonError) -> Response {
    AppError(err).into_response()
}
