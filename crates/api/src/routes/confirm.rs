//! Public confirmation page redeeming one-time links.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use domain::DomainError;
use persistence::repositories::LinkRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Redeem a one-time link and reveal the purchased seat count.
///
/// GET /confirm/:token
///
/// The first caller flips the link and sees the seat count; everyone
/// after that (and any unknown token) gets the same invalid-link page.
/// This endpoint is public and renders HTML for a human viewer.
pub async fn confirm(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    if !shared::token::is_well_formed(&token) {
        return Ok(render_invalid().into_response());
    }

    let repo = LinkRepository::new(state.pool.clone());
    match repo.redeem(&token).await {
        Ok(redeemed) => {
            tracing::info!(count_seats = redeemed.count_seats, "confirmation link redeemed");
            Ok(Html(render_success(redeemed.count_seats)).into_response())
        }
        Err(DomainError::InvalidOrUsedLink) => Ok(render_invalid().into_response()),
        Err(other) => Err(other.into()),
    }
}

fn render_success(count_seats: i32) -> String {
    format!("<h1>You have purchased {} seat(s).</h1>", count_seats)
}

fn render_invalid() -> (StatusCode, Html<&'static str>) {
    (
        StatusCode::NOT_FOUND,
        Html("<h1>This link is invalid or has already been used.</h1>"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_page_names_seat_count() {
        let html = render_success(3);
        assert!(html.contains("3 seat(s)"));
    }

    #[test]
    fn test_invalid_page_status() {
        let (status, _) = render_invalid();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
