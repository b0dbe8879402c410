//! Booking routes: CRUD, payment-proof upload/download, confirmation-link
//! issue.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    BookingPatch, BookingResponse, BookingState, ConfirmationLinkResponse, CreateBookingRequest,
    CreatedBookingResponse,
};
use persistence::repositories::{BookingRepository, LinkRepository};
use persistence::storage::artifact_key;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::events::SuccessResponse;

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub event_id: Option<Uuid>,
}

/// List bookings, optionally filtered by event.
///
/// GET /api/bookings?event_id=...
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let bookings = repo.list(query.event_id).await?;
    let responses: Result<Vec<BookingResponse>, _> =
        bookings.into_iter().map(TryInto::try_into).collect();
    Ok(Json(responses.map_err(ApiError::from)?))
}

/// Create a booking, atomically checking event capacity.
///
/// POST /api/bookings
///
/// A retry after a timeout can create a duplicate booking; the API has no
/// idempotency key. Callers should re-list their bookings after an
/// ambiguous failure instead of blindly resubmitting.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreatedBookingResponse>), ApiError> {
    request.validate()?;

    let repo = BookingRepository::new(state.pool.clone());
    let booking = repo.create_reserved(&request).await?;

    tracing::info!(
        booking_id = %booking.id,
        event_id = %booking.event_id,
        count_seats = booking.count_seats,
        "booking created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedBookingResponse { id: booking.id }),
    ))
}

/// Get a single booking.
///
/// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let booking = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("booking not found".into()))?;
    Ok(Json(booking.try_into()?))
}

/// Apply a partial update to a booking.
///
/// PATCH /api/bookings/:id
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<BookingPatch>,
) -> Result<Json<CreatedBookingResponse>, ApiError> {
    patch.validate()?;

    let repo = BookingRepository::new(state.pool.clone());
    let booking = repo.update(id, &patch).await?;

    tracing::info!(booking_id = %id, verified = booking.verified, expired = booking.expired, "booking updated");

    Ok(Json(CreatedBookingResponse { id: booking.id }))
}

/// Delete a booking, freeing its seats.
///
/// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    repo.delete(id).await?;

    tracing::info!(booking_id = %id, "booking deleted");

    Ok(Json(SuccessResponse { success: true }))
}

/// Upload the payment-proof file for a booking.
///
/// POST /api/bookings/:id/payment-file (multipart, field "file")
///
/// A re-upload overwrites the previous artifact.
pub async fn upload_payment_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SuccessResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("booking not found".into()))?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {}", e)))?
        .ok_or_else(|| ApiError::Validation("missing file field".into()))?;

    let filename = field
        .file_name()
        .map(|name| name.to_string())
        .ok_or_else(|| ApiError::Validation("uploaded field has no filename".into()))?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::Validation(format!("failed to read upload: {}", e)))?;

    if bytes.is_empty() {
        return Err(ApiError::Validation("uploaded file is empty".into()));
    }

    let key = artifact_key(id, &filename);
    state.artifacts.put(&key, &bytes).await?;
    repo.attach_payment(id, &key).await?;

    tracing::info!(booking_id = %id, key = %key, size = bytes.len(), "payment file uploaded");

    Ok(Json(SuccessResponse { success: true }))
}

/// Download the payment-proof file for a booking.
///
/// GET /api/bookings/:id/payment-file
pub async fn get_payment_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let booking = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("booking not found".into()))?;

    let key = booking
        .payment_file
        .ok_or_else(|| ApiError::NotFound("payment file not found".into()))?;

    let bytes = state.artifacts.get(&key).await?;
    let content_type = shared::mime::content_type_for(&key);

    // Filename for the browser save dialog; the key is "{booking_id}_{name}"
    let filename = key.split_once('_').map(|(_, name)| name).unwrap_or(&key);

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
            (
                header::ACCESS_CONTROL_EXPOSE_HEADERS,
                "Content-Disposition".to_string(),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Issue a one-time confirmation link for a verified booking.
///
/// POST /api/bookings/:id/confirmation-link
///
/// Issuing again returns a fresh token; earlier unredeemed tokens for the
/// booking stay valid until used.
pub async fn issue_confirmation_link(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ConfirmationLinkResponse>), ApiError> {
    let bookings = BookingRepository::new(state.pool.clone());
    let booking = bookings
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("booking not found".into()))?;

    if booking.state()? != BookingState::Verified {
        return Err(ApiError::Validation(
            "confirmation links can only be issued for verified bookings".into(),
        ));
    }

    let links = LinkRepository::new(state.pool.clone());
    let token = shared::token::generate_token();
    let link = links.issue(id, &token).await?;

    tracing::info!(booking_id = %id, link_id = %link.id, "confirmation link issued");

    Ok((
        StatusCode::CREATED,
        Json(ConfirmationLinkResponse::new(
            &state.config.server.public_base_url,
            link.token,
        )),
    ))
}
