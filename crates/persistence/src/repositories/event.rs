//! Event repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{CreateEventRequest, Event, EventPatch};
use domain::DomainError;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;
use crate::storage_error;

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event.
    pub async fn create(&self, request: &CreateEventRequest) -> Result<Event, DomainError> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (name, text, max_seats, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, text, max_seats, price, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.text)
        .bind(request.max_seats)
        .bind(request.price)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
            .map(Into::into)
            .map_err(|e| storage_error("event", e))
    }

    /// Find an event by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, DomainError> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, name, text, max_seats, price, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
            .map(|row| row.map(Into::into))
            .map_err(|e| storage_error("event", e))
    }

    /// List all events, newest first.
    pub async fn list_all(&self) -> Result<Vec<Event>, DomainError> {
        let timer = QueryTimer::new("list_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, name, text, max_seats, price, created_at
            FROM events
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(|e| storage_error("event", e))
    }

    /// Apply a partial update to an event.
    ///
    /// Performed as a scoped read-modify-write transaction holding the row
    /// lock, so a concurrent patch never interleaves with the merge.
    /// Shrinking `max_seats` below the booked total is allowed; existing
    /// bookings stay valid.
    pub async fn update(&self, id: Uuid, patch: &EventPatch) -> Result<Event, DomainError> {
        let timer = QueryTimer::new("update_event");
        let result = self.update_inner(id, patch).await;
        timer.record();
        result
    }

    async fn update_inner(&self, id: Uuid, patch: &EventPatch) -> Result<Event, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("event", e))?;

        let entity = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, name, text, max_seats, price, created_at
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| storage_error("event", e))?;

        let mut event: Event = entity.ok_or(DomainError::NotFound("event"))?.into();
        patch.apply_to(&mut event);

        sqlx::query(
            r#"
            UPDATE events
            SET name = $2, text = $3, max_seats = $4, price = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&event.name)
        .bind(&event.text)
        .bind(event.max_seats)
        .bind(event.price)
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("event", e))?;

        tx.commit().await.map_err(|e| storage_error("event", e))?;
        Ok(event)
    }

    /// Delete an event. Its bookings go with it via the FK cascade.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        match result {
            Ok(done) if done.rows_affected() == 0 => Err(DomainError::NotFound("event")),
            Ok(_) => Ok(()),
            Err(e) => Err(storage_error("event", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    // Note: EventRepository tests require a database connection and are
    // covered by the integration tests in crates/api/tests.
}
