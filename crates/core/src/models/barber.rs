use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::{BarberSchedule, BlockedDates, BreakInterval, WeeklySchedule};

/// A barber with the display fields of their user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barber {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    #[serde(flatten)]
    pub schedule: BarberSchedule,
}

/// Partial schedule edit; absent fields are left untouched.
///
/// Deserialization already rejects opening hours and breaks whose start is
/// not before their end, and dates that are not `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub working_hours: Option<WeeklySchedule>,
    pub break_times: Option<Vec<BreakInterval>>,
    pub blocked_days: Option<BlockedDates>,
}

impl UpdateScheduleRequest {
    pub fn apply(self, mut schedule: BarberSchedule) -> BarberSchedule {
        if let Some(working_hours) = self.working_hours {
            schedule.working_hours = working_hours;
        }
        if let Some(break_times) = self.break_times {
            schedule.break_times = break_times;
        }
        if let Some(blocked_days) = self.blocked_days {
            schedule.blocked_days = blocked_days;
        }
        schedule
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarberResponse {
    pub barber: Barber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarberListResponse {
    pub barbers: Vec<Barber>,
}
