//! Booking domain models and the booking lifecycle state machine.
//!
//! The persisted representation keeps the (payment_file, verified, expired)
//! field triple; `BookingState` is derived from it. All mutation paths go
//! through [`BookingPatch::apply_to`], which enforces the legal transitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

/// A reservation of N seats against one event by one requester.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_phone: String,
    pub user_nickname: Option<String>,
    pub count_seats: i32,
    pub total_cash: i64,
    pub verified: bool,
    pub expired: bool,
    /// Storage key of the uploaded payment artifact, if any.
    pub payment_file: Option<String>,
}

/// Lifecycle state derived from the persisted field triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingState {
    /// Just created, awaiting payment proof.
    Pending,
    /// Payment proof uploaded, awaiting operator review.
    PaymentAttached,
    /// Operator confirmed the payment. Terminal.
    Verified,
    /// Marked invalid by an operator or the system. Terminal.
    Expired,
}

impl BookingState {
    /// Derive the state from the persisted flags.
    ///
    /// `verified && expired` is contradictory and rejected everywhere.
    pub fn from_flags(
        has_payment_file: bool,
        verified: bool,
        expired: bool,
    ) -> Result<Self, DomainError> {
        match (verified, expired) {
            (true, true) => Err(DomainError::Validation(
                "a booking cannot be both verified and expired".into(),
            )),
            (true, false) => Ok(BookingState::Verified),
            (false, true) => Ok(BookingState::Expired),
            (false, false) if has_payment_file => Ok(BookingState::PaymentAttached),
            (false, false) => Ok(BookingState::Pending),
        }
    }

    /// Whether the state admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingState::Verified | BookingState::Expired)
    }

    /// Legal lifecycle transitions. Staying in place is always allowed.
    ///
    /// Verification requires an attached payment; expiry may strike a
    /// booking at any non-terminal point.
    pub fn can_transition(self, to: BookingState) -> bool {
        use BookingState::*;
        match (self, to) {
            (from, to) if from == to => true,
            (Pending, PaymentAttached) => true,
            (Pending, Expired) => true,
            (PaymentAttached, Verified) => true,
            (PaymentAttached, Expired) => true,
            _ => false,
        }
    }
}

impl Booking {
    /// Current lifecycle state.
    pub fn state(&self) -> Result<BookingState, DomainError> {
        BookingState::from_flags(self.payment_file.is_some(), self.verified, self.expired)
    }
}

/// Request to create a booking.
///
/// `total_cash` is intentionally absent: the server recomputes it from the
/// event price, never trusting a client-supplied figure.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateBookingRequest {
    pub event_id: Uuid,

    #[validate(custom(function = "shared::phone::validate_phone"))]
    pub user_phone: String,

    #[validate(length(min = 1, max = 100, message = "nickname must be 1-100 characters"))]
    pub user_nickname: Option<String>,

    #[validate(range(min = 1, message = "count_seats must be positive"))]
    pub count_seats: i32,
}

/// Partial update for a booking. Only supplied fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct BookingPatch {
    #[validate(custom(function = "shared::phone::validate_phone"))]
    pub user_phone: Option<String>,

    #[validate(length(min = 1, max = 100, message = "nickname must be 1-100 characters"))]
    pub user_nickname: Option<String>,

    #[validate(range(min = 1, message = "count_seats must be positive"))]
    pub count_seats: Option<i32>,

    pub verified: Option<bool>,
    pub expired: Option<bool>,
}

impl BookingPatch {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.user_phone.is_none()
            && self.user_nickname.is_none()
            && self.count_seats.is_none()
            && self.verified.is_none()
            && self.expired.is_none()
    }

    /// Field-by-field merge onto an existing booking, enforcing the
    /// lifecycle: terminal states never revert, and `verified`/`expired`
    /// are mutually exclusive.
    ///
    /// A `count_seats` change is applied here but must be re-checked
    /// against event capacity by the caller before it is persisted.
    pub fn apply_to(&self, booking: &mut Booking) -> Result<(), DomainError> {
        let current = booking.state()?;

        let verified = self.verified.unwrap_or(booking.verified);
        let expired = self.expired.unwrap_or(booking.expired);
        let next = BookingState::from_flags(booking.payment_file.is_some(), verified, expired)?;

        if !current.can_transition(next) {
            return Err(DomainError::Validation(format!(
                "illegal booking transition {:?} -> {:?}",
                current, next
            )));
        }

        if let Some(phone) = &self.user_phone {
            booking.user_phone = shared::phone::normalize_phone(phone);
        }
        if let Some(nickname) = &self.user_nickname {
            booking.user_nickname = Some(nickname.clone());
        }
        if let Some(count_seats) = self.count_seats {
            booking.count_seats = count_seats;
        }
        booking.verified = verified;
        booking.expired = expired;
        Ok(())
    }
}

/// Booking representation returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BookingResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_phone: String,
    pub user_nickname: Option<String>,
    pub count_seats: i32,
    pub total_cash: i64,
    pub verified: bool,
    pub expired: bool,
    pub state: BookingState,
    pub has_payment_file: bool,
}

impl TryFrom<Booking> for BookingResponse {
    type Error = DomainError;

    fn try_from(booking: Booking) -> Result<Self, DomainError> {
        let state = booking.state()?;
        Ok(Self {
            id: booking.id,
            event_id: booking.event_id,
            user_phone: booking.user_phone,
            user_nickname: booking.user_nickname,
            count_seats: booking.count_seats,
            total_cash: booking.total_cash,
            verified: booking.verified,
            expired: booking.expired,
            state,
            has_payment_file: booking.payment_file.is_some(),
        })
    }
}

/// Minimal response after create/update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreatedBookingResponse {
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking() -> Booking {
        Booking {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            user_phone: "71234567890".into(),
            user_nickname: None,
            count_seats: 2,
            total_cash: 1000,
            verified: false,
            expired: false,
            payment_file: None,
        }
    }

    #[test]
    fn test_state_derivation() {
        assert_eq!(
            BookingState::from_flags(false, false, false).unwrap(),
            BookingState::Pending
        );
        assert_eq!(
            BookingState::from_flags(true, false, false).unwrap(),
            BookingState::PaymentAttached
        );
        assert_eq!(
            BookingState::from_flags(true, true, false).unwrap(),
            BookingState::Verified
        );
        assert_eq!(
            BookingState::from_flags(false, false, true).unwrap(),
            BookingState::Expired
        );
    }

    #[test]
    fn test_verified_and_expired_is_contradictory() {
        assert!(BookingState::from_flags(true, true, true).is_err());
        assert!(BookingState::from_flags(false, true, true).is_err());
    }

    #[test]
    fn test_terminal_states_do_not_revert() {
        assert!(!BookingState::Verified.can_transition(BookingState::Pending));
        assert!(!BookingState::Verified.can_transition(BookingState::Expired));
        assert!(!BookingState::Expired.can_transition(BookingState::Pending));
        assert!(!BookingState::Expired.can_transition(BookingState::Verified));
        assert!(!BookingState::PaymentAttached.can_transition(BookingState::Pending));
    }

    #[test]
    fn test_verification_requires_attached_payment() {
        assert!(!BookingState::Pending.can_transition(BookingState::Verified));
        assert!(BookingState::PaymentAttached.can_transition(BookingState::Verified));
    }

    #[test]
    fn test_expiry_allowed_before_payment() {
        assert!(BookingState::Pending.can_transition(BookingState::Expired));
    }

    #[test]
    fn test_patch_verifies_booking_with_payment() {
        let mut booking = sample_booking();
        booking.payment_file = Some("key".into());

        let patch = BookingPatch {
            verified: Some(true),
            ..Default::default()
        };
        patch.apply_to(&mut booking).unwrap();
        assert!(booking.verified);
        assert_eq!(booking.state().unwrap(), BookingState::Verified);
    }

    #[test]
    fn test_patch_rejects_verify_without_payment() {
        let mut booking = sample_booking();
        let patch = BookingPatch {
            verified: Some(true),
            ..Default::default()
        };
        assert!(matches!(
            patch.apply_to(&mut booking),
            Err(DomainError::Validation(_))
        ));
        assert!(!booking.verified);
    }

    #[test]
    fn test_patch_rejects_verified_and_expired_together() {
        let mut booking = sample_booking();
        booking.payment_file = Some("key".into());
        let patch = BookingPatch {
            verified: Some(true),
            expired: Some(true),
            ..Default::default()
        };
        assert!(patch.apply_to(&mut booking).is_err());
    }

    #[test]
    fn test_patch_rejects_unexpiring_a_booking() {
        let mut booking = sample_booking();
        booking.expired = true;
        let patch = BookingPatch {
            expired: Some(false),
            ..Default::default()
        };
        assert!(patch.apply_to(&mut booking).is_err());
        assert!(booking.expired);
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut booking = sample_booking();
        let patch = BookingPatch {
            user_nickname: Some("user123".into()),
            count_seats: Some(3),
            ..Default::default()
        };
        patch.apply_to(&mut booking).unwrap();
        assert_eq!(booking.user_nickname.as_deref(), Some("user123"));
        assert_eq!(booking.count_seats, 3);
        assert_eq!(booking.user_phone, "71234567890");
    }

    #[test]
    fn test_patch_normalizes_phone() {
        let mut booking = sample_booking();
        let patch = BookingPatch {
            user_phone: Some("+79998887766".into()),
            ..Default::default()
        };
        patch.apply_to(&mut booking).unwrap();
        assert_eq!(booking.user_phone, "79998887766");
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreateBookingRequest {
            event_id: Uuid::new_v4(),
            user_phone: "+71234567890".into(),
            user_nickname: None,
            count_seats: 2,
        };
        assert!(valid.validate().is_ok());

        let zero_seats = CreateBookingRequest {
            count_seats: 0,
            ..valid.clone()
        };
        assert!(zero_seats.validate().is_err());

        let bad_phone = CreateBookingRequest {
            user_phone: "abc".into(),
            ..valid
        };
        assert!(bad_phone.validate().is_err());
    }
}
