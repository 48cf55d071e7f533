use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{SalonError, SalonResult},
    time::{self, Interval},
};

/// Lifecycle of an appointment.
///
/// ```text
/// pending ──► confirmed ──► completed
///    │            │
///    └──────► canceled ◄┘
/// ```
///
/// `completed` and `canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Canceled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Canceled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Canceled)
        )
    }

    /// Returns `next` when the edge exists, `InvalidTransition` otherwise.
    pub fn transition_to(&self, next: AppointmentStatus) -> SalonResult<AppointmentStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(SalonError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = SalonError;

    fn from_str(s: &str) -> SalonResult<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            other => Err(SalonError::Validation(format!(
                "Unknown appointment status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "time::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "time::hhmm")]
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn interval(&self) -> Interval {
        Interval::from_times(self.start_time, self.end_time)
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }
}

/// An appointment joined with the names a dashboard shows next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub service_name: Option<String>,
    pub service_price: Option<f64>,
    pub barber_name: Option<String>,
    pub client_name: Option<String>,
}

/// The write-path view of a proposed or rescheduled appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedSlot {
    pub barber_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ProposedSlot {
    pub fn new(
        barber_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> SalonResult<Self> {
        if start_time >= end_time {
            return Err(SalonError::Validation(format!(
                "Start time {} must be before end time {}",
                time::format_time(start_time),
                time::format_time(end_time)
            )));
        }
        Ok(Self {
            barber_id,
            date,
            start_time,
            end_time,
        })
    }

    pub fn interval(&self) -> Interval {
        Interval::from_times(self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "time::hhmm")]
    pub start_time: NaiveTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub barber_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "time::hhmm")]
    pub start_time: NaiveTime,
    #[serde(default, with = "time::hhmm_option")]
    pub end_time: Option<NaiveTime>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(default, with = "time::hhmm_option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_option")]
    pub end_time: Option<NaiveTime>,
}

impl UpdateAppointmentRequest {
    pub fn reschedules(&self) -> bool {
        self.date.is_some() || self.start_time.is_some() || self.end_time.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub appointment: AppointmentDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<AppointmentDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotsResponse {
    pub slots: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_test::{assert_tokens, Token};

    use super::AppointmentStatus::*;

    #[rstest]
    #[case(Pending, Confirmed, true)]
    #[case(Pending, Canceled, true)]
    #[case(Confirmed, Completed, true)]
    #[case(Confirmed, Canceled, true)]
    #[case(Pending, Completed, false)]
    #[case(Pending, Pending, false)]
    #[case(Confirmed, Pending, false)]
    #[case(Completed, Canceled, false)]
    #[case(Completed, Confirmed, false)]
    #[case(Canceled, Pending, false)]
    #[case(Canceled, Confirmed, false)]
    fn status_edges(
        #[case] from: AppointmentStatus,
        #[case] to: AppointmentStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
        assert_eq!(from.transition_to(to).is_ok(), allowed);
    }

    #[test]
    fn rejected_transition_names_both_states() {
        let err = Canceled.transition_to(Confirmed).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid status transition from canceled to confirmed"
        );
    }

    #[test]
    fn status_uses_lowercase_names() {
        assert_tokens(
            &Pending,
            &[Token::UnitVariant {
                name: "AppointmentStatus",
                variant: "pending",
            }],
        );
        assert_eq!("canceled".parse::<AppointmentStatus>().unwrap(), Canceled);
        assert!("cancelled".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn proposed_slot_requires_start_before_end() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert!(ProposedSlot::new(Uuid::new_v4(), date, ten, ten).is_err());
    }

    #[test]
    fn appointment_json_uses_wall_clock_strings() {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            barber_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 45, 0).unwrap(),
            status: Confirmed,
            notes: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&appointment).unwrap();
        assert_eq!(json["date"], "2024-03-04");
        assert_eq!(json["start_time"], "09:15");
        assert_eq!(json["end_time"], "09:45");
        assert_eq!(json["status"], "confirmed");
    }
}
