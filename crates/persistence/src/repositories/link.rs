//! One-time link repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{OneTimeLink, RedeemedSeats};
use domain::DomainError;

use crate::entities::LinkEntity;
use crate::metrics::QueryTimer;
use crate::storage_error;

/// Repository for one-time confirmation links.
#[derive(Clone)]
pub struct LinkRepository {
    pool: PgPool,
}

impl LinkRepository {
    /// Creates a new LinkRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a dormant link for a booking.
    ///
    /// The caller checks that the booking is verified before issuing; the
    /// token comes from `shared::token::generate_token`.
    pub async fn issue(&self, booking_id: Uuid, token: &str) -> Result<OneTimeLink, DomainError> {
        let timer = QueryTimer::new("issue_link");
        let result = sqlx::query_as::<_, LinkEntity>(
            r#"
            INSERT INTO links (booking_id, token)
            VALUES ($1, $2)
            RETURNING id, booking_id, token, expired, created_at
            "#,
        )
        .bind(booking_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
            .map(Into::into)
            .map_err(|e| storage_error("link", e))
    }

    /// Redeem a token, returning the confirmed booking's seat count.
    ///
    /// One compare-and-set statement flips `expired: false -> true`; the
    /// row lock taken by UPDATE serializes racing redeemers, so exactly one
    /// caller sees the row and every other gets `InvalidOrUsedLink`. An
    /// unknown token takes the same error path, indistinguishable to the
    /// caller.
    pub async fn redeem(&self, token: &str) -> Result<RedeemedSeats, DomainError> {
        let timer = QueryTimer::new("redeem_link");
        let result = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE links l
            SET expired = TRUE
            FROM bookings b
            WHERE l.token = $1 AND l.expired = FALSE AND b.id = l.booking_id
            RETURNING b.count_seats
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        match result {
            Ok(Some(count_seats)) => Ok(RedeemedSeats { count_seats }),
            Ok(None) => Err(DomainError::InvalidOrUsedLink),
            Err(e) => Err(storage_error("link", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    // Note: LinkRepository tests require a database connection; the
    // exactly-once redemption property is covered by the integration tests
    // in crates/api/tests.
}
