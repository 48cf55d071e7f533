use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/services", get(handlers::services::list_services))
        .route("/api/barbers", get(handlers::barbers::list_barbers))
        .route(
            "/api/barbers/:id/available-slots",
            get(handlers::availability::available_slots),
        )
}
