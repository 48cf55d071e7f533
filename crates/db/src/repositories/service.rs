use crate::models::DbService;
use chrono::Utc;
use eyre::Result;
use salon_core::models::service::{CreateServiceRequest, UpdateServiceRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn list_services(pool: &Pool<Postgres>) -> Result<Vec<DbService>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, price, duration_minutes, description, created_at
        FROM services
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(services)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, price, duration_minutes, description, created_at
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn create_service(
    pool: &Pool<Postgres>,
    request: &CreateServiceRequest,
) -> Result<DbService> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (id, name, price, duration_minutes, description, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, price, duration_minutes, description, created_at
        "#,
    )
    .bind(id)
    .bind(request.name.trim())
    .bind(request.price)
    .bind(i32::try_from(request.duration_minutes)?)
    .bind(request.description.as_deref())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

/// Updates the given fields; `None` keeps the stored value.
pub async fn update_service(
    pool: &Pool<Postgres>,
    id: Uuid,
    request: &UpdateServiceRequest,
) -> Result<Option<DbService>> {
    let duration = request.duration_minutes.map(i32::try_from).transpose()?;

    let service = sqlx::query_as::<_, DbService>(
        r#"
        UPDATE services
        SET name = COALESCE($2, name),
            price = COALESCE($3, price),
            duration_minutes = COALESCE($4, duration_minutes),
            description = COALESCE($5, description)
        WHERE id = $1
        RETURNING id, name, price, duration_minutes, description, created_at
        "#,
    )
    .bind(id)
    .bind(request.name.as_deref().map(str::trim))
    .bind(request.price)
    .bind(duration)
    .bind(request.description.as_deref())
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn delete_service(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let deleted = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted > 0)
}
