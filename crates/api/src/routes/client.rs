use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::{handlers, middleware::auth, ApiState};

/// Routes for signed-in clients.
pub fn routes(state: Arc<ApiState>) -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/client/appointments",
            get(handlers::appointments::list_client_appointments)
                .post(handlers::appointments::book_appointment),
        )
        .route(
            "/api/client/appointments/:id",
            delete(handlers::appointments::cancel_client_appointment),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::require_client))
}
