pub mod appointment;
pub mod barber;
pub mod client;
pub mod service;
pub mod stats;
pub mod user;
