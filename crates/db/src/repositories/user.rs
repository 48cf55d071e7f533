use crate::models::DbUser;
use chrono::Utc;
use eyre::Result;
use salon_core::{
    errors::{SalonError, SalonResult},
    models::{schedule::WeeklySchedule, user::Role},
};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, phone, role, photo_url, created_at";

/// Fields of a user account about to be created.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone: Option<&'a str>,
    pub role: Role,
}

/// Creates a user together with the barber or client record its role needs.
pub async fn create_user(pool: &Pool<Postgres>, user: NewUser<'_>) -> SalonResult<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, email={}, role={}", id, user.email, user.role);

    let mut tx = pool.begin().await.map_err(store_error)?;

    let created = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        INSERT INTO users (id, name, email, password_hash, phone, role, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user.name.trim())
    .bind(user.email.trim())
    .bind(user.password_hash)
    .bind(user.phone)
    .bind(user.role.as_str())
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| unique_violation(e, "Email already exists"))?;

    ensure_profile(&mut *tx, id, user.role).await?;

    tx.commit().await.map_err(store_error)?;

    tracing::debug!("User created successfully: id={}", id);
    Ok(created)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
    ))
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn list_users(pool: &Pool<Postgres>) -> Result<Vec<DbUser>> {
    let users = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Inserts the barber or client record `role` needs unless the user already has one.
/// New barbers start on the default weekly template with no breaks or blocked days.
async fn ensure_profile(conn: &mut PgConnection, user_id: Uuid, role: Role) -> SalonResult<()> {
    match role {
        Role::Barber => {
            let working_hours = serde_json::to_value(WeeklySchedule::default_template())
                .map_err(|e| SalonError::Internal(Box::new(e)))?;
            sqlx::query(
                r#"
                INSERT INTO barbers (id, user_id, working_hours, break_times, blocked_days)
                VALUES ($1, $2, $3, '[]'::jsonb, '[]'::jsonb)
                ON CONFLICT (user_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(working_hours)
            .execute(&mut *conn)
            .await
            .map_err(store_error)?;
        }
        Role::Client => {
            sqlx::query(
                r#"
                INSERT INTO clients (id, user_id, loyalty_points)
                VALUES ($1, $2, 0)
                ON CONFLICT (user_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .execute(&mut *conn)
            .await
            .map_err(store_error)?;
        }
        Role::Admin => {}
    }
    Ok(())
}

/// Updates the given fields; `None` keeps the stored value.
///
/// A role change creates the barber or client record the new role needs in
/// the same transaction. A record left over from the previous role is kept
/// so that past appointments stay attached to it.
pub async fn update_user(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
    role: Option<Role>,
) -> SalonResult<Option<DbUser>> {
    let mut tx = pool.begin().await.map_err(store_error)?;

    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            role = COALESCE($5, role)
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(role.map(|role| role.as_str()))
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| unique_violation(e, "Email already exists"))?;

    if let (Some(_), Some(role)) = (&user, role) {
        ensure_profile(&mut *tx, id, role).await?;
    }

    tx.commit().await.map_err(store_error)?;

    Ok(user)
}

/// Deletes a user along with their appointments and barber or client record.
/// Returns `false` when no such user exists.
pub async fn delete_user(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM appointments
        WHERE barber_id IN (SELECT id FROM barbers WHERE user_id = $1)
           OR client_id IN (SELECT id FROM clients WHERE user_id = $1)
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM barbers WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM clients WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    Ok(deleted > 0)
}

pub(crate) fn store_error(err: sqlx::Error) -> SalonError {
    SalonError::Database(err.into())
}

fn unique_violation(err: sqlx::Error, message: &str) -> SalonError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            SalonError::Validation(message.to_string())
        }
        _ => store_error(err),
    }
}
