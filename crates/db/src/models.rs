//! Rows as they come out of PostgreSQL, and their conversion into the typed
//! entities of `salon-core`. Conversion is where loosely shaped stored data
//! is checked: unknown enum strings fail with `Validation`, unreadable
//! schedule documents degrade to closed days.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use salon_core::{
    errors::{SalonError, SalonResult},
    models::{
        appointment::{Appointment, AppointmentDetails},
        barber::Barber,
        schedule::{breaks_from_stored, BarberSchedule, BlockedDates, WeeklySchedule},
        service::Service,
        user::User,
    },
    stats::StatsRow,
    time::Interval,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = SalonError;

    fn try_from(row: DbUser) -> SalonResult<Self> {
        Ok(User {
            role: row.role.parse()?,
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            photo_url: row.photo_url,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBarber {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub working_hours: Value,
    pub break_times: Value,
    pub blocked_days: Value,
}

impl DbBarber {
    /// Reads the stored schedule documents, closing any day whose hours
    /// cannot be understood.
    pub fn schedule(&self) -> BarberSchedule {
        let (working_hours, discarded) = WeeklySchedule::from_stored(&self.working_hours);
        if !discarded.is_empty() {
            tracing::warn!(
                "Barber {} has unreadable working hours for {:?}; treating those days as closed",
                self.id,
                discarded
            );
        }
        BarberSchedule {
            working_hours,
            break_times: breaks_from_stored(&self.break_times),
            blocked_days: BlockedDates::from_stored(&self.blocked_days),
        }
    }
}

impl From<DbBarber> for Barber {
    fn from(row: DbBarber) -> Self {
        let schedule = row.schedule();
        Barber {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            photo_url: row.photo_url,
            schedule,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub loyalty_points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbService> for Service {
    type Error = SalonError;

    fn try_from(row: DbService) -> SalonResult<Self> {
        let duration_minutes = u32::try_from(row.duration_minutes)
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| {
                SalonError::Validation(format!(
                    "Service {} has an invalid duration of {} minutes",
                    row.id, row.duration_minutes
                ))
            })?;
        Ok(Service {
            id: row.id,
            name: row.name,
            price: row.price,
            duration_minutes,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = SalonError;

    fn try_from(row: DbAppointment) -> SalonResult<Self> {
        Ok(Appointment {
            status: row.status.parse()?,
            id: row.id,
            barber_id: row.barber_id,
            client_id: row.client_id,
            service_id: row.service_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointmentDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub appointment: DbAppointment,
    pub service_name: Option<String>,
    pub service_price: Option<f64>,
    pub barber_name: Option<String>,
    pub client_name: Option<String>,
}

impl TryFrom<DbAppointmentDetails> for AppointmentDetails {
    type Error = SalonError;

    fn try_from(row: DbAppointmentDetails) -> SalonResult<Self> {
        Ok(AppointmentDetails {
            appointment: row.appointment.try_into()?,
            service_name: row.service_name,
            service_price: row.service_price,
            barber_name: row.barber_name,
            client_name: row.client_name,
        })
    }
}

/// Start and end of a non-canceled appointment, as needed by the overlap rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct DbBookedInterval {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<DbBookedInterval> for Interval {
    fn from(row: DbBookedInterval) -> Self {
        Interval::from_times(row.start_time, row.end_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStatsRow {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub barber_name: Option<String>,
    pub service_name: Option<String>,
    pub service_price: Option<f64>,
}

impl From<DbStatsRow> for StatsRow {
    fn from(row: DbStatsRow) -> Self {
        StatsRow {
            date: row.date,
            start_time: row.start_time,
            barber_name: row.barber_name,
            service_name: row.service_name,
            service_price: row.service_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use salon_core::models::appointment::AppointmentStatus;
    use serde_json::json;

    fn appointment_row(status: &str) -> DbAppointment {
        DbAppointment {
            id: Uuid::new_v4(),
            barber_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            status: status.to_string(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("pending", Some(AppointmentStatus::Pending))]
    #[case("confirmed", Some(AppointmentStatus::Confirmed))]
    #[case("completed", Some(AppointmentStatus::Completed))]
    #[case("canceled", Some(AppointmentStatus::Canceled))]
    #[case("maybe", None)]
    #[case("", None)]
    fn stored_status_is_checked_at_the_boundary(
        #[case] stored: &str,
        #[case] expected: Option<AppointmentStatus>,
    ) {
        match (Appointment::try_from(appointment_row(stored)), expected) {
            (Ok(appointment), Some(status)) => assert_eq!(appointment.status, status),
            (Err(SalonError::Validation(_)), None) => {}
            (other, _) => panic!("unexpected conversion of {:?}: {:?}", stored, other),
        }
    }

    #[test]
    fn unknown_role_is_rejected_at_the_boundary() {
        let row = DbUser {
            id: Uuid::new_v4(),
            name: "Root".to_string(),
            email: "root@example.com".to_string(),
            password_hash: "x".to_string(),
            phone: None,
            role: "superuser".to_string(),
            photo_url: None,
            created_at: Utc::now(),
        };
        assert!(matches!(User::try_from(row), Err(SalonError::Validation(_))));
    }

    #[test]
    fn non_positive_service_duration_is_rejected() {
        let row = DbService {
            id: Uuid::new_v4(),
            name: "Cut".to_string(),
            price: 25.0,
            duration_minutes: 0,
            description: None,
            created_at: Utc::now(),
        };
        assert!(Service::try_from(row).is_err());
    }

    #[test]
    fn broken_schedule_documents_close_the_barber() {
        let row = DbBarber {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Luca".to_string(),
            email: "luca@example.com".to_string(),
            phone: None,
            photo_url: None,
            working_hours: json!("not a schedule"),
            break_times: json!(null),
            blocked_days: json!({}),
        };
        let schedule = row.schedule();

        assert_eq!(schedule.working_hours, WeeklySchedule::closed());
        assert!(schedule.break_times.is_empty());
        assert_eq!(schedule.blocked_days, BlockedDates::default());
    }
}
