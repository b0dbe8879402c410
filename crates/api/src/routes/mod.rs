//! HTTP route handlers.

pub mod auth;
pub mod bookings;
pub mod confirm;
pub mod events;
pub mod health;
