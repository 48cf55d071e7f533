pub mod appointments;
pub mod auth;
pub mod availability;
pub mod barbers;
pub mod services;
pub mod stats;
pub mod users;
