//! Event domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A bookable occasion with finite seat capacity and a per-seat price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub text: String,
    pub max_seats: i32,
    pub price: i32,
}

impl Event {
    /// Server-side total for a reservation. Client-supplied totals are
    /// never trusted.
    pub fn total_price(&self, count_seats: i32) -> i64 {
        count_seats as i64 * self.price as i64
    }
}

/// Request to create a new event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = 4000, message = "text must be at most 4000 characters"))]
    pub text: String,

    #[validate(range(min = 1, message = "max_seats must be positive"))]
    pub max_seats: i32,

    #[validate(range(min = 0, message = "price must be non-negative"))]
    pub price: i32,
}

/// Partial update for an event. Only supplied fields are applied.
///
/// Shrinking `max_seats` below the currently booked total is a permitted
/// administrative override and does not invalidate existing bookings.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct EventPatch {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 4000, message = "text must be at most 4000 characters"))]
    pub text: Option<String>,

    #[validate(range(min = 1, message = "max_seats must be positive"))]
    pub max_seats: Option<i32>,

    #[validate(range(min = 0, message = "price must be non-negative"))]
    pub price: Option<i32>,
}

impl EventPatch {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.text.is_none()
            && self.max_seats.is_none()
            && self.price.is_none()
    }

    /// Field-by-field merge onto an existing event.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(name) = &self.name {
            event.name = name.clone();
        }
        if let Some(text) = &self.text {
            event.text = text.clone();
        }
        if let Some(max_seats) = self.max_seats {
            event.max_seats = max_seats;
        }
        if let Some(price) = self.price {
            event.price = price;
        }
    }
}

/// Event representation returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventResponse {
    pub id: Uuid,
    pub name: String,
    pub text: String,
    pub max_seats: i32,
    pub price: i32,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            text: event.text,
            max_seats: event.max_seats,
            price: event.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event {
            id: Uuid::new_v4(),
            name: "XYZ Concert".into(),
            text: "An incredible show".into(),
            max_seats: 100,
            price: 500,
        }
    }

    #[test]
    fn test_total_price_recomputed_from_seats() {
        let event = sample_event();
        assert_eq!(event.total_price(3), 1500);
        assert_eq!(event.total_price(0), 0);
    }

    #[test]
    fn test_total_price_does_not_overflow_i32() {
        let mut event = sample_event();
        event.price = i32::MAX;
        assert_eq!(event.total_price(2), i32::MAX as i64 * 2);
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreateEventRequest {
            name: "XYZ Concert".into(),
            text: "desc".into(),
            max_seats: 10,
            price: 0,
        };
        assert!(valid.validate().is_ok());

        let zero_seats = CreateEventRequest {
            max_seats: 0,
            ..valid.clone()
        };
        assert!(zero_seats.validate().is_err());

        let negative_price = CreateEventRequest {
            price: -1,
            ..valid.clone()
        };
        assert!(negative_price.validate().is_err());

        let empty_name = CreateEventRequest {
            name: "".into(),
            ..valid
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut event = sample_event();
        let original_name = event.name.clone();

        let patch = EventPatch {
            max_seats: Some(150),
            price: Some(700),
            ..Default::default()
        };
        patch.apply_to(&mut event);

        assert_eq!(event.name, original_name);
        assert_eq!(event.max_seats, 150);
        assert_eq!(event.price, 700);
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut event = sample_event();
        let before = format!("{:?}", event);

        let patch = EventPatch::default();
        assert!(patch.is_empty());
        patch.apply_to(&mut event);

        assert_eq!(format!("{:?}", event), before);
    }

    #[test]
    fn test_patch_validation() {
        let patch = EventPatch {
            max_seats: Some(0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
