//! Domain layer for the event-booking backend.
//!
//! This crate contains:
//! - Domain models (Event, Booking, OneTimeLink)
//! - The booking lifecycle state machine
//! - The reservation dialogue state machine
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::DomainError;
