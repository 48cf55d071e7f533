//! Appointment storage.
//!
//! Every write that can change when a barber is busy goes through the same
//! sequence inside one transaction: lock the barber row, read the barber's
//! non-canceled appointments on the target date, run
//! [`validate_no_overlap`], then write. Concurrent bookings for one barber
//! therefore serialize on the row lock and the later one sees the earlier
//! one's row, so at most one of two identical requests succeeds.

use crate::models::{DbAppointment, DbAppointmentDetails, DbBookedInterval};
use crate::repositories::user::store_error;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use salon_core::{
    booking::validate_no_overlap,
    errors::{SalonError, SalonResult},
    models::appointment::{Appointment, AppointmentStatus, ProposedSlot},
    time::Interval,
};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str =
    "id, barber_id, client_id, service_id, date, start_time, end_time, status, notes, created_at";

const DETAILS_SELECT: &str = r#"
    SELECT a.id, a.barber_id, a.client_id, a.service_id, a.date, a.start_time, a.end_time,
           a.status, a.notes, a.created_at,
           s.name AS service_name, s.price AS service_price,
           bu.name AS barber_name, cu.name AS client_name
    FROM appointments a
    LEFT JOIN services s ON s.id = a.service_id
    LEFT JOIN barbers b ON b.id = a.barber_id
    LEFT JOIN users bu ON bu.id = b.user_id
    LEFT JOIN clients c ON c.id = a.client_id
    LEFT JOIN users cu ON cu.id = c.user_id
"#;

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub barber_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

/// The complete set of mutable fields after an update has been decided.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentChanges {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

impl From<&Appointment> for AppointmentChanges {
    fn from(current: &Appointment) -> Self {
        Self {
            date: current.date,
            start_time: current.start_time,
            end_time: current.end_time,
            status: current.status,
            notes: current.notes.clone(),
        }
    }
}

/// Filters for appointment listings; `None` matches everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentFilter {
    pub barber_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

/// Start/end of the barber's non-canceled appointments on `date`.
pub async fn get_active_intervals(
    pool: &Pool<Postgres>,
    barber_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<Interval>> {
    let mut conn = pool.acquire().await?;
    let intervals = active_intervals(&mut conn, barber_id, date, None).await?;
    Ok(intervals)
}

async fn active_intervals(
    conn: &mut PgConnection,
    barber_id: Uuid,
    date: NaiveDate,
    excluding: Option<Uuid>,
) -> std::result::Result<Vec<Interval>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DbBookedInterval>(
        r#"
        SELECT start_time, end_time
        FROM appointments
        WHERE barber_id = $1
          AND date = $2
          AND status <> 'canceled'
          AND ($3::uuid IS NULL OR id <> $3)
        ORDER BY start_time ASC
        "#,
    )
    .bind(barber_id)
    .bind(date)
    .bind(excluding)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(Interval::from).collect())
}

async fn lock_barber(conn: &mut PgConnection, barber_id: Uuid) -> SalonResult<()> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM barbers WHERE id = $1 FOR UPDATE")
        .bind(barber_id)
        .fetch_optional(conn)
        .await
        .map_err(store_error)?
        .map(|_| ())
        .ok_or_else(|| SalonError::NotFound(format!("Barber with ID {} not found", barber_id)))
}

async fn guard_slot(
    conn: &mut PgConnection,
    slot: &ProposedSlot,
    excluding: Option<Uuid>,
) -> SalonResult<()> {
    lock_barber(conn, slot.barber_id).await?;
    let existing = active_intervals(conn, slot.barber_id, slot.date, excluding)
        .await
        .map_err(store_error)?;
    validate_no_overlap(slot, &existing).inspect_err(|e| {
        tracing::warn!("Rejected booking for barber {}: {}", slot.barber_id, e);
    })
}

/// Inserts an appointment after checking the slot is still free.
pub async fn create_appointment(
    pool: &Pool<Postgres>,
    new: &NewAppointment,
) -> SalonResult<DbAppointment> {
    let slot = ProposedSlot::new(new.barber_id, new.date, new.start_time, new.end_time)?;
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Booking appointment: id={}, barber={}, date={}, {}-{}",
        id, new.barber_id, new.date, new.start_time, new.end_time
    );

    let mut tx = pool.begin().await.map_err(store_error)?;

    guard_slot(&mut tx, &slot, None).await?;

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments
            (id, barber_id, client_id, service_id, date, start_time, end_time, status, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(new.barber_id)
    .bind(new.client_id)
    .bind(new.service_id)
    .bind(new.date)
    .bind(new.start_time)
    .bind(new.end_time)
    .bind(new.status.as_str())
    .bind(new.notes.as_deref())
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(store_error)?;

    tx.commit().await.map_err(store_error)?;

    tracing::debug!("Appointment booked successfully: id={}", id);
    Ok(appointment)
}

/// Locks the appointment, lets `plan` decide its new field values from the
/// current state, re-checks the slot when the appointment moves or becomes
/// active, and writes the result.
pub async fn update_appointment<F>(
    pool: &Pool<Postgres>,
    id: Uuid,
    plan: F,
) -> SalonResult<DbAppointment>
where
    F: FnOnce(&Appointment) -> SalonResult<AppointmentChanges> + Send,
{
    let mut tx = pool.begin().await.map_err(store_error)?;

    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(store_error)?
    .ok_or_else(|| SalonError::NotFound(format!("Appointment with ID {} not found", id)))?;

    let current = Appointment::try_from(row)?;
    let changes = plan(&current)?;

    let slot =
        ProposedSlot::new(current.barber_id, changes.date, changes.start_time, changes.end_time)?;

    let moved = changes.date != current.date
        || changes.start_time != current.start_time
        || changes.end_time != current.end_time;
    let reactivated = current.status == AppointmentStatus::Canceled;
    if (moved || reactivated) && changes.status != AppointmentStatus::Canceled {
        guard_slot(&mut tx, &slot, Some(id)).await?;
    }

    let updated = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET date = $2, start_time = $3, end_time = $4, status = $5, notes = $6
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(changes.date)
    .bind(changes.start_time)
    .bind(changes.end_time)
    .bind(changes.status.as_str())
    .bind(changes.notes.as_deref())
    .fetch_one(&mut *tx)
    .await
    .map_err(store_error)?;

    tx.commit().await.map_err(store_error)?;

    tracing::debug!(
        "Appointment {} updated: status {} -> {}",
        id, current.status, changes.status
    );
    Ok(updated)
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn get_appointment_details(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointmentDetails>> {
    let appointment =
        sqlx::query_as::<_, DbAppointmentDetails>(&format!("{DETAILS_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(appointment)
}

/// Newest first: by date, then start time, both descending.
pub async fn list_appointments(
    pool: &Pool<Postgres>,
    filter: AppointmentFilter,
) -> Result<Vec<DbAppointmentDetails>> {
    let appointments = sqlx::query_as::<_, DbAppointmentDetails>(&format!(
        r#"
        {DETAILS_SELECT}
        WHERE ($1::uuid IS NULL OR a.barber_id = $1)
          AND ($2::uuid IS NULL OR a.client_id = $2)
          AND ($3::date IS NULL OR a.date = $3)
        ORDER BY a.date DESC, a.start_time DESC
        "#
    ))
    .bind(filter.barber_id)
    .bind(filter.client_id)
    .bind(filter.date)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn delete_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let deleted = sqlx::query("DELETE FROM appointments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted > 0)
}
