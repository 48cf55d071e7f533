use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{SalonError, SalonResult},
    time,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_minutes: u32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub price: f64,
    pub duration_minutes: u32,
    pub description: Option<String>,
}

impl CreateServiceRequest {
    pub fn validate(&self) -> SalonResult<()> {
        validate_fields(Some(&self.name), Some(self.price), Some(self.duration_minutes))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub duration_minutes: Option<u32>,
    pub description: Option<String>,
}

impl UpdateServiceRequest {
    pub fn validate(&self) -> SalonResult<()> {
        validate_fields(self.name.as_ref(), self.price, self.duration_minutes)
    }
}

fn validate_fields(name: Option<&String>, price: Option<f64>, duration: Option<u32>) -> SalonResult<()> {
    if name.is_some_and(|name| name.trim().is_empty()) {
        return Err(SalonError::Validation("Service name must not be empty".to_string()));
    }
    if price.is_some_and(|price| !price.is_finite() || price < 0.0) {
        return Err(SalonError::Validation("Service price must be zero or more".to_string()));
    }
    match duration {
        Some(minutes) => time::validate_duration(minutes),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub service: Service,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub services: Vec<Service>,
}
