//! One-time confirmation link models.

use serde::Serialize;
use uuid::Uuid;

/// A single-use token that discloses a booking's seat count once and is
/// then permanently invalidated. Links never expire by time, only by use.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OneTimeLink {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub token: String,
    pub expired: bool,
}

/// Response after issuing a confirmation link for a verified booking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfirmationLinkResponse {
    pub token: String,
    pub url: String,
}

impl ConfirmationLinkResponse {
    /// Build the redemption URL handed to the requester (typically rendered
    /// as a QR code by the front end).
    pub fn new(public_base_url: &str, token: String) -> Self {
        let url = format!("{}/confirm/{}", public_base_url.trim_end_matches('/'), token);
        Self { token, url }
    }
}

/// Seat count revealed by a successful redemption.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RedeemedSeats {
    pub count_seats: i32,
}
