use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, middleware::auth, ApiState};

/// Routes for admins.
pub fn routes(state: Arc<ApiState>) -> Router<Arc<ApiState>> {
    Router::new()
        // Accounts
        .route(
            "/api/admin/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/admin/users/:id",
            patch(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        // Barber schedules
        .route("/api/admin/barbers", get(handlers::barbers::list_barbers))
        .route("/api/admin/barbers/:id", patch(handlers::barbers::update_barber))
        // Service catalogue
        .route("/api/admin/services", post(handlers::services::create_service))
        .route(
            "/api/admin/services/:id",
            patch(handlers::services::update_service).delete(handlers::services::delete_service),
        )
        // Appointments
        .route(
            "/api/admin/appointments",
            get(handlers::appointments::list_all_appointments)
                .post(handlers::appointments::create_appointment),
        )
        .route(
            "/api/admin/appointments/:id",
            patch(handlers::appointments::update_appointment)
                .delete(handlers::appointments::delete_appointment),
        )
        .route("/api/admin/stats", get(handlers::stats::salon_stats))
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin))
}
