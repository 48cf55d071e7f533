use axum::{
    middleware,
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

use crate::{handlers, middleware::auth, ApiState};

/// Routes for signed-in barbers, all scoped to the caller's own records.
pub fn routes(state: Arc<ApiState>) -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/barber/appointments",
            get(handlers::appointments::list_barber_appointments),
        )
        .route(
            "/api/barber/appointments/:id/status",
            patch(handlers::appointments::update_barber_appointment_status),
        )
        .route(
            "/api/barber/schedule",
            get(handlers::barbers::get_own_schedule).put(handlers::barbers::update_own_schedule),
        )
        .route("/api/barber/stats", get(handlers::stats::barber_stats))
        .route_layer(middleware::from_fn_with_state(state, auth::require_barber))
}
