//! # Salon core
//!
//! Domain types and the pure scheduling rules of the salon booking service:
//! the barber schedule model, slot generation, the double-booking guard, the
//! appointment status machine and dashboard statistics. Nothing in this
//! crate performs I/O; the store and the HTTP layer live in `salon-db` and
//! `salon-api`.

pub mod availability;
pub mod booking;
pub mod errors;
pub mod models;
pub mod stats;
pub mod time;
