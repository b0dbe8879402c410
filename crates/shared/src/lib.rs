//! Shared utilities for the event-booking backend.
//!
//! This crate provides common functionality used across all other crates:
//! - One-time confirmation token generation
//! - Phone number normalization and validation
//! - Bearer-token (JWT) utilities
//! - Password hashing with Argon2id
//! - MIME inference for uploaded payment artifacts

pub mod jwt;
pub mod mime;
pub mod password;
pub mod phone;
pub mod token;
