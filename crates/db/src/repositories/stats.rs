use crate::models::DbStatsRow;
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Non-canceled appointments dated `since` or later, optionally for one barber.
pub async fn get_stats_rows(
    pool: &Pool<Postgres>,
    since: NaiveDate,
    barber_id: Option<Uuid>,
) -> Result<Vec<DbStatsRow>> {
    let rows = sqlx::query_as::<_, DbStatsRow>(
        r#"
        SELECT a.date, a.start_time,
               bu.name AS barber_name,
               s.name AS service_name,
               s.price AS service_price
        FROM appointments a
        LEFT JOIN services s ON s.id = a.service_id
        LEFT JOIN barbers b ON b.id = a.barber_id
        LEFT JOIN users bu ON bu.id = b.user_id
        WHERE a.date >= $1
          AND a.status <> 'canceled'
          AND ($2::uuid IS NULL OR a.barber_id = $2)
        ORDER BY a.date ASC, a.start_time ASC
        "#,
    )
    .bind(since)
    .bind(barber_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
