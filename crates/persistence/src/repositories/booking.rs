//! Booking repository for database operations.
//!
//! The capacity check and the insert (or seat-count change) execute inside
//! one transaction that holds a row lock on the event, so concurrent
//! reservations against the same event serialize and can never jointly
//! oversell. Lock order everywhere is event row first, then booking row.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use domain::models::{Booking, BookingPatch, CreateBookingRequest};
use domain::services::ledger;
use domain::DomainError;

use crate::entities::BookingEntity;
use crate::metrics::QueryTimer;
use crate::storage_error;

/// Event fields needed while holding the event row lock.
#[derive(Debug, sqlx::FromRow)]
struct LockedEvent {
    max_seats: i32,
    price: i32,
}

/// Repository for booking-related database operations.
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Creates a new BookingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock the event row, serializing all capacity-relevant writes for
    /// that event until the transaction ends.
    async fn lock_event(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
    ) -> Result<LockedEvent, DomainError> {
        sqlx::query_as::<_, LockedEvent>(
            r#"
            SELECT max_seats, price
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| storage_error("event", e))?
        .ok_or(DomainError::NotFound("event"))
    }

    /// Sum of seats committed to an event, optionally excluding one
    /// booking (used when that booking's own count is being changed).
    async fn booked_seats(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(count_seats), 0)
            FROM bookings
            WHERE event_id = $1 AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(event_id)
        .bind(exclude)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| storage_error("booking", e))
    }

    /// Atomically check capacity and create a booking in the pending state.
    ///
    /// `total_cash` is recomputed from the event price; the caller never
    /// supplies it. Fails with `NotFound` for an unknown event and
    /// `CapacityExceeded` when the seats do not fit.
    pub async fn create_reserved(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<Booking, DomainError> {
        let timer = QueryTimer::new("create_booking");
        let result = self.create_reserved_inner(request).await;
        timer.record();
        result
    }

    async fn create_reserved_inner(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<Booking, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("booking", e))?;

        let event = Self::lock_event(&mut tx, request.event_id).await?;
        let already_booked = Self::booked_seats(&mut tx, request.event_id, None).await?;
        ledger::check_reservation(event.max_seats, already_booked, request.count_seats)?;

        let total_cash = request.count_seats as i64 * event.price as i64;
        let phone = shared::phone::normalize_phone(&request.user_phone);

        let entity = sqlx::query_as::<_, BookingEntity>(
            r#"
            INSERT INTO bookings (event_id, user_phone, user_nickname, count_seats, total_cash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, event_id, user_phone, user_nickname, count_seats, total_cash,
                      verified, expired, payment_file, created_at
            "#,
        )
        .bind(request.event_id)
        .bind(&phone)
        .bind(&request.user_nickname)
        .bind(request.count_seats)
        .bind(total_cash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage_error("booking", e))?;

        tx.commit().await.map_err(|e| storage_error("booking", e))?;
        Ok(entity.into())
    }

    /// Find a booking by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, DomainError> {
        let timer = QueryTimer::new("find_booking_by_id");
        let result = sqlx::query_as::<_, BookingEntity>(
            r#"
            SELECT id, event_id, user_phone, user_nickname, count_seats, total_cash,
                   verified, expired, payment_file, created_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
            .map(|row| row.map(Into::into))
            .map_err(|e| storage_error("booking", e))
    }

    /// List bookings, optionally filtered by event.
    pub async fn list(&self, event_id: Option<Uuid>) -> Result<Vec<Booking>, DomainError> {
        let timer = QueryTimer::new("list_bookings");
        let result = sqlx::query_as::<_, BookingEntity>(
            r#"
            SELECT id, event_id, user_phone, user_nickname, count_seats, total_cash,
                   verified, expired, payment_file, created_at
            FROM bookings
            WHERE ($1::uuid IS NULL OR event_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(|e| storage_error("booking", e))
    }

    /// Apply a partial update to a booking.
    ///
    /// The lifecycle rules are enforced by [`BookingPatch::apply_to`]; a
    /// `count_seats` change additionally re-validates event capacity under
    /// the event row lock, and `total_cash` is recomputed from the event
    /// price.
    pub async fn update(&self, id: Uuid, patch: &BookingPatch) -> Result<Booking, DomainError> {
        let timer = QueryTimer::new("update_booking");
        let result = self.update_inner(id, patch).await;
        timer.record();
        result
    }

    async fn update_inner(&self, id: Uuid, patch: &BookingPatch) -> Result<Booking, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("booking", e))?;

        // Resolve the owning event without locking the booking yet; the
        // event lock must always be taken first.
        let event_id = sqlx::query_scalar::<_, Uuid>("SELECT event_id FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| storage_error("booking", e))?
            .ok_or(DomainError::NotFound("booking"))?;

        let event = Self::lock_event(&mut tx, event_id).await?;

        let entity = sqlx::query_as::<_, BookingEntity>(
            r#"
            SELECT id, event_id, user_phone, user_nickname, count_seats, total_cash,
                   verified, expired, payment_file, created_at
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| storage_error("booking", e))?
        .ok_or(DomainError::NotFound("booking"))?;

        let mut booking: Booking = entity.into();
        let seats_changed = patch
            .count_seats
            .map(|n| n != booking.count_seats)
            .unwrap_or(false);

        patch.apply_to(&mut booking)?;

        if seats_changed {
            let others = Self::booked_seats(&mut tx, event_id, Some(id)).await?;
            ledger::check_reservation(event.max_seats, others, booking.count_seats)?;
            booking.total_cash = booking.count_seats as i64 * event.price as i64;
        }

        sqlx::query(
            r#"
            UPDATE bookings
            SET user_phone = $2, user_nickname = $3, count_seats = $4, total_cash = $5,
                verified = $6, expired = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&booking.user_phone)
        .bind(&booking.user_nickname)
        .bind(booking.count_seats)
        .bind(booking.total_cash)
        .bind(booking.verified)
        .bind(booking.expired)
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("booking", e))?;

        tx.commit().await.map_err(|e| storage_error("booking", e))?;
        Ok(booking)
    }

    /// Record the storage key of an uploaded payment artifact.
    ///
    /// A re-upload overwrites the previous reference; the artifact store
    /// overwrites the bytes under the same key.
    pub async fn attach_payment(&self, id: Uuid, storage_key: &str) -> Result<(), DomainError> {
        let timer = QueryTimer::new("attach_payment_file");
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET payment_file = $2
            WHERE id = $1 AND verified = FALSE AND expired = FALSE
            "#,
        )
        .bind(id)
        .bind(storage_key)
        .execute(&self.pool)
        .await;
        timer.record();
        match result {
            Ok(done) if done.rows_affected() == 0 => {
                // Distinguish a missing booking from a terminal one
                match self.find_by_id(id).await? {
                    None => Err(DomainError::NotFound("booking")),
                    Some(_) => Err(DomainError::Validation(
                        "cannot attach payment to a verified or expired booking".into(),
                    )),
                }
            }
            Ok(_) => Ok(()),
            Err(e) => Err(storage_error("booking", e)),
        }
    }

    /// Delete a booking. Its seats return to the pool implicitly; the
    /// ledger recomputes from the remaining rows.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let timer = QueryTimer::new("delete_booking");
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        match result {
            Ok(done) if done.rows_affected() == 0 => Err(DomainError::NotFound("booking")),
            Ok(_) => Ok(()),
            Err(e) => Err(storage_error("booking", e)),
        }
    }

    /// Seats still available for an event (read-only ledger query).
    pub async fn seats_available(&self, event_id: Uuid) -> Result<i64, DomainError> {
        let timer = QueryTimer::new("seats_available");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT e.max_seats - COALESCE(SUM(b.count_seats), 0)
            FROM events e
            LEFT JOIN bookings b ON b.event_id = e.id
            WHERE e.id = $1
            GROUP BY e.max_seats
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        match result {
            Ok(Some(available)) => Ok(available),
            Ok(None) => Err(DomainError::NotFound("event")),
            Err(e) => Err(storage_error("event", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    // Note: BookingRepository tests require a database connection; the
    // capacity serialization and cascade behavior are covered by the
    // integration tests in crates/api/tests.
}
