use axum::{extract::State, Extension, Json};
use salon_core::{
    errors::SalonError,
    models::stats::{BarberStats, SalonStats},
    stats::{self, StatsPeriod, StatsRow},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    middleware::{
        auth::Session,
        error_handling::{AppError, AppQuery},
    },
    ApiState,
};

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub period: StatsPeriod,
}

/// Salon-wide figures for the admin dashboard.
#[axum::debug_handler]
pub async fn salon_stats(
    State(state): State<Arc<ApiState>>,
    AppQuery(query): AppQuery<StatsQuery>,
) -> Result<Json<SalonStats>, AppError> {
    let since = query.period.start_date(state.salon_now().date());

    let rows: Vec<StatsRow> = salon_db::repositories::stats::get_stats_rows(&state.db_pool, since, None)
        .await
        .map_err(SalonError::Database)?
        .into_iter()
        .map(StatsRow::from)
        .collect();
    let total_clients = salon_db::repositories::client::count_clients(&state.db_pool)
        .await
        .map_err(SalonError::Database)?;
    let total_barbers = salon_db::repositories::barber::count_barbers(&state.db_pool)
        .await
        .map_err(SalonError::Database)?;

    Ok(Json(stats::salon_stats(&rows, total_clients, total_barbers)))
}

/// The calling barber's own figures.
#[axum::debug_handler]
pub async fn barber_stats(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
    AppQuery(query): AppQuery<StatsQuery>,
) -> Result<Json<BarberStats>, AppError> {
    let barber_id = session.profile()?;
    let since = query.period.start_date(state.salon_now().date());

    let rows: Vec<StatsRow> =
        salon_db::repositories::stats::get_stats_rows(&state.db_pool, since, Some(barber_id))
            .await
            .map_err(SalonError::Database)?
            .into_iter()
            .map(StatsRow::from)
            .collect();

    Ok(Json(stats::barber_stats(&rows)))
}
