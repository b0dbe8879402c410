//! Booking entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Booking;

/// Database row mapping for the bookings table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_phone: String,
    pub user_nickname: Option<String>,
    pub count_seats: i32,
    pub total_cash: i64,
    pub verified: bool,
    pub expired: bool,
    pub payment_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookingEntity> for Booking {
    fn from(entity: BookingEntity) -> Self {
        Booking {
            id: entity.id,
            event_id: entity.event_id,
            user_phone: entity.user_phone,
            user_nickname: entity.user_nickname,
            count_seats: entity.count_seats,
            total_cash: entity.total_cash,
            verified: entity.verified,
            expired: entity.expired,
            payment_file: entity.payment_file,
        }
    }
}
