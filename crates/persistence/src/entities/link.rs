//! One-time link entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::OneTimeLink;

/// Database row mapping for the links table.
#[derive(Debug, Clone, FromRow)]
pub struct LinkEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub token: String,
    pub expired: bool,
    pub created_at: DateTime<Utc>,
}

impl From<LinkEntity> for OneTimeLink {
    fn from(entity: LinkEntity) -> Self {
        OneTimeLink {
            id: entity.id,
            booking_id: entity.booking_id,
            token: entity.token,
            expired: entity.expired,
        }
    }
}
