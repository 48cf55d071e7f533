use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalonStats {
    pub total_appointments: usize,
    pub total_revenue: f64,
    pub total_clients: i64,
    pub total_barbers: i64,
    pub most_booked_barber: Option<NamedCount>,
    pub most_popular_service: Option<NamedCount>,
    pub peak_hours: Vec<HourCount>,
    pub appointments_by_day: BTreeMap<NaiveDate, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarberStats {
    pub total_appointments: usize,
    pub total_revenue: f64,
    pub most_selected_service: Option<NamedCount>,
    pub appointments_by_day: BTreeMap<NaiveDate, usize>,
}
