pub mod admin;
pub mod auth;
pub mod barber;
pub mod client;
pub mod health;
pub mod public;
