//! Event catalog routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{CreateEventRequest, EventPatch, EventResponse};
use persistence::repositories::{BookingRepository, EventRepository};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// List all events.
///
/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let events = repo.list_all().await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// Create an event.
///
/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let event = repo.create(&request).await?;

    tracing::info!(event_id = %event.id, name = %event.name, max_seats = event.max_seats, "event created");

    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Get a single event.
///
/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let event = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("event not found".into()))?;
    Ok(Json(event.into()))
}

/// Apply a partial update to an event.
///
/// PATCH /api/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<EventResponse>, ApiError> {
    patch.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let event = repo.update(id, &patch).await?;

    tracing::info!(event_id = %id, "event updated");

    Ok(Json(event.into()))
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub seats_available: i64,
}

/// Seats still available for an event.
///
/// GET /api/events/:id/availability
///
/// Read-only ledger snapshot; a concurrent booking can consume the
/// reported seats before the caller acts on them.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let seats_available = repo.seats_available(id).await?;
    Ok(Json(AvailabilityResponse { seats_available }))
}

/// Delete an event and, by cascade, its bookings.
///
/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    repo.delete(id).await?;

    tracing::info!(event_id = %id, "event deleted");

    Ok(Json(SuccessResponse { success: true }))
}
