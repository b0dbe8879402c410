//! Seat inventory accounting.
//!
//! Pure arithmetic over the booked-vs-available figures for one event.
//! The atomic check-and-reserve lives in the booking repository, which
//! calls [`check_reservation`] while holding the event row lock; two
//! requests can therefore never act on the same stale total.

use crate::error::DomainError;

/// Seats still available for an event given the committed total.
///
/// Can go negative after an administrative `max_seats` shrink; existing
/// bookings are not retroactively invalidated.
pub fn seats_available(max_seats: i32, already_booked: i64) -> i64 {
    max_seats as i64 - already_booked
}

/// Can `requested` more seats be reserved?
///
/// Fails with `CapacityExceeded` when the event is over capacity and with
/// `Validation` for a non-positive request.
pub fn check_reservation(
    max_seats: i32,
    already_booked: i64,
    requested: i32,
) -> Result<(), DomainError> {
    if requested <= 0 {
        return Err(DomainError::Validation(
            "count_seats must be positive".into(),
        ));
    }

    let available = seats_available(max_seats, already_booked);
    if (requested as i64) <= available {
        Ok(())
    } else {
        Err(DomainError::CapacityExceeded {
            available: available.max(0),
            requested: requested as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_within_capacity() {
        assert!(check_reservation(10, 0, 6).is_ok());
        assert!(check_reservation(10, 6, 4).is_ok());
    }

    #[test]
    fn test_reservation_exactly_filling_capacity() {
        assert!(check_reservation(10, 0, 10).is_ok());
    }

    // Scenario from the booking flow: 6 then 5 overbooks, 6 then 4 fills.
    #[test]
    fn test_reservation_sequence() {
        assert!(check_reservation(10, 0, 6).is_ok());
        assert!(matches!(
            check_reservation(10, 6, 5),
            Err(DomainError::CapacityExceeded {
                available: 4,
                requested: 5
            })
        ));
        assert!(check_reservation(10, 6, 4).is_ok());
        assert!(matches!(
            check_reservation(10, 10, 1),
            Err(DomainError::CapacityExceeded {
                available: 0,
                requested: 1
            })
        ));
    }

    #[test]
    fn test_non_positive_request_is_validation_error() {
        assert!(matches!(
            check_reservation(10, 0, 0),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            check_reservation(10, 0, -3),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_overbooked_event_reports_zero_available() {
        // max_seats shrunk below the committed total by an operator
        assert!(matches!(
            check_reservation(5, 8, 1),
            Err(DomainError::CapacityExceeded {
                available: 0,
                requested: 1
            })
        ));
        assert_eq!(seats_available(5, 8), -3);
    }
}
