pub mod appointment;
pub mod barber;
pub mod schedule;
pub mod service;
pub mod stats;
pub mod user;
