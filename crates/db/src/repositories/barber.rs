use crate::models::DbBarber;
use eyre::Result;
use salon_core::models::schedule::BarberSchedule;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const BARBER_SELECT: &str = r#"
    SELECT b.id, b.user_id, u.name, u.email, u.phone, u.photo_url,
           b.working_hours, b.break_times, b.blocked_days
    FROM barbers b
    JOIN users u ON u.id = b.user_id
"#;

/// Lists users who currently hold the barber role.
pub async fn list_barbers(pool: &Pool<Postgres>) -> Result<Vec<DbBarber>> {
    let barbers = sqlx::query_as::<_, DbBarber>(&format!(
        "{BARBER_SELECT} WHERE u.role = 'barber' ORDER BY u.name ASC"
    ))
        .fetch_all(pool)
        .await?;

    Ok(barbers)
}

pub async fn get_barber_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBarber>> {
    tracing::debug!("Getting barber by id: {}", id);

    let barber = sqlx::query_as::<_, DbBarber>(&format!("{BARBER_SELECT} WHERE b.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(barber)
}

pub async fn get_barber_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<DbBarber>> {
    let barber = sqlx::query_as::<_, DbBarber>(&format!("{BARBER_SELECT} WHERE b.user_id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(barber)
}

/// Replaces the stored schedule documents of a barber.
pub async fn update_barber_schedule(
    pool: &Pool<Postgres>,
    id: Uuid,
    schedule: &BarberSchedule,
) -> Result<Option<DbBarber>> {
    tracing::debug!("Updating schedule of barber {}", id);

    let updated = sqlx::query(
        r#"
        UPDATE barbers
        SET working_hours = $2, break_times = $3, blocked_days = $4
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(serde_json::to_value(&schedule.working_hours)?)
    .bind(serde_json::to_value(&schedule.break_times)?)
    .bind(serde_json::to_value(&schedule.blocked_days)?)
    .execute(pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Ok(None);
    }
    get_barber_by_id(pool, id).await
}

pub async fn count_barbers(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM barbers")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
