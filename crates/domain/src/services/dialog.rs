//! Reservation dialogue state machine.
//!
//! The chat front end walks a user through contact sharing, seat selection
//! and payment-proof upload. The dialogue is a pure state machine: a named
//! state enum, one input event per step, and a transition function that
//! returns the next state, the outgoing reply and an optional effect for
//! the caller to execute. Chat transport, keyboards and QR rendering stay
//! outside; so does the booking lifecycle itself, which the caller drives
//! through the same operations the HTTP surface uses.

use serde::Serialize;

/// Catalog data the dialogue needs to make decisions. Supplied by the
/// caller from the event catalog and the ledger.
#[derive(Debug, Clone)]
pub struct EventSnapshot {
    pub name: String,
    pub price: i32,
    pub seats_available: i64,
}

/// Dialogue position for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    /// Waiting for the user to share a contact.
    AwaitingContact,
    /// Contact known, waiting for a seat count.
    AwaitingSeats { phone: String },
    /// Booking placed, waiting for a payment-proof file.
    AwaitingPayment { phone: String, count_seats: i32 },
    /// Dialogue finished (confirmed or cancelled).
    Done,
}

/// One user input per dialogue step.
#[derive(Debug, Clone)]
pub enum DialogInput {
    /// The /start command.
    Start,
    /// A shared contact.
    Contact { phone: String },
    /// Free text (seat counts arrive this way).
    Text(String),
    /// An uploaded document or photo.
    PaymentFile { filename: String },
    /// The /cancel command.
    Cancel,
}

/// Outgoing reply rendered by the chat front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DialogReply {
    Greeting { event_name: String },
    NoUpcomingEvent,
    AskContact,
    AskSeats,
    InvalidSeatCount,
    InsufficientSeats { available: i64 },
    PaymentInstructions { count_seats: i32, total_cash: i64 },
    AskPaymentFile,
    UnsupportedFileFormat,
    PaymentReceived,
    Cancelled,
}

/// Side effect the caller must execute after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEffect {
    /// Create a pending booking for the normalized phone.
    CreateBooking { phone: String, count_seats: i32 },
    /// Attach the uploaded file to the user's pending booking and issue
    /// a confirmation link once the operator verifies it.
    AttachPayment { filename: String },
}

/// Result of one dialogue step.
#[derive(Debug, Clone)]
pub struct Transition {
    pub next: DialogState,
    pub reply: DialogReply,
    pub effect: Option<DialogEffect>,
}

impl Transition {
    fn stay(state: DialogState, reply: DialogReply) -> Self {
        Self {
            next: state,
            reply,
            effect: None,
        }
    }
}

/// Pure transition function for the reservation dialogue.
///
/// `event` is the snapshot for the upcoming event, or `None` when nothing
/// is scheduled.
pub fn step(state: DialogState, input: DialogInput, event: Option<&EventSnapshot>) -> Transition {
    // /cancel aborts from any position
    if matches!(input, DialogInput::Cancel) {
        return Transition {
            next: DialogState::Done,
            reply: DialogReply::Cancelled,
            effect: None,
        };
    }

    match state {
        DialogState::AwaitingContact => match input {
            DialogInput::Start => match event {
                Some(snapshot) => Transition::stay(
                    DialogState::AwaitingContact,
                    DialogReply::Greeting {
                        event_name: snapshot.name.clone(),
                    },
                ),
                None => Transition {
                    next: DialogState::Done,
                    reply: DialogReply::NoUpcomingEvent,
                    effect: None,
                },
            },
            DialogInput::Contact { phone } => {
                let phone = shared::phone::normalize_phone(&phone);
                Transition {
                    next: DialogState::AwaitingSeats { phone },
                    reply: DialogReply::AskSeats,
                    effect: None,
                }
            }
            // Anything else re-prompts for the contact button
            _ => Transition::stay(DialogState::AwaitingContact, DialogReply::AskContact),
        },

        DialogState::AwaitingSeats { phone } => match (input, event) {
            (DialogInput::Text(text), Some(snapshot)) => {
                match text.trim().parse::<i32>() {
                    Ok(count_seats) if count_seats > 0 => {
                        if count_seats as i64 > snapshot.seats_available {
                            return Transition::stay(
                                DialogState::AwaitingSeats { phone },
                                DialogReply::InsufficientSeats {
                                    available: snapshot.seats_available.max(0),
                                },
                            );
                        }
                        let total_cash = count_seats as i64 * snapshot.price as i64;
                        Transition {
                            next: DialogState::AwaitingPayment {
                                phone: phone.clone(),
                                count_seats,
                            },
                            reply: DialogReply::PaymentInstructions {
                                count_seats,
                                total_cash,
                            },
                            effect: Some(DialogEffect::CreateBooking { phone, count_seats }),
                        }
                    }
                    _ => Transition::stay(
                        DialogState::AwaitingSeats { phone },
                        DialogReply::InvalidSeatCount,
                    ),
                }
            }
            (_, _) => Transition::stay(
                DialogState::AwaitingSeats { phone },
                DialogReply::InvalidSeatCount,
            ),
        },

        DialogState::AwaitingPayment { phone, count_seats } => match input {
            DialogInput::PaymentFile { filename } => {
                if shared::mime::content_type_for(&filename) == shared::mime::OCTET_STREAM {
                    return Transition::stay(
                        DialogState::AwaitingPayment { phone, count_seats },
                        DialogReply::UnsupportedFileFormat,
                    );
                }
                Transition {
                    next: DialogState::Done,
                    reply: DialogReply::PaymentReceived,
                    effect: Some(DialogEffect::AttachPayment { filename }),
                }
            }
            _ => Transition::stay(
                DialogState::AwaitingPayment { phone, count_seats },
                DialogReply::AskPaymentFile,
            ),
        },

        DialogState::Done => Transition::stay(DialogState::Done, DialogReply::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> EventSnapshot {
        EventSnapshot {
            name: "XYZ Concert".into(),
            price: 1000,
            seats_available: 100,
        }
    }

    #[test]
    fn test_start_greets_when_event_exists() {
        let t = step(
            DialogState::AwaitingContact,
            DialogInput::Start,
            Some(&snapshot()),
        );
        assert_eq!(t.next, DialogState::AwaitingContact);
        assert_eq!(
            t.reply,
            DialogReply::Greeting {
                event_name: "XYZ Concert".into()
            }
        );
        assert!(t.effect.is_none());
    }

    #[test]
    fn test_start_ends_without_event() {
        let t = step(DialogState::AwaitingContact, DialogInput::Start, None);
        assert_eq!(t.next, DialogState::Done);
        assert_eq!(t.reply, DialogReply::NoUpcomingEvent);
    }

    #[test]
    fn test_contact_advances_and_normalizes_phone() {
        let t = step(
            DialogState::AwaitingContact,
            DialogInput::Contact {
                phone: "8 (123) 456-78-90".into(),
            },
            Some(&snapshot()),
        );
        match t.next {
            DialogState::AwaitingSeats { phone } => assert_eq!(phone, "71234567890"),
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(t.reply, DialogReply::AskSeats);
    }

    #[test]
    fn test_unexpected_input_reprompts_for_contact() {
        let t = step(
            DialogState::AwaitingContact,
            DialogInput::Text("hello".into()),
            Some(&snapshot()),
        );
        assert_eq!(t.next, DialogState::AwaitingContact);
        assert_eq!(t.reply, DialogReply::AskContact);
    }

    #[test]
    fn test_valid_seat_count_creates_booking_effect() {
        let t = step(
            DialogState::AwaitingSeats {
                phone: "71234567890".into(),
            },
            DialogInput::Text("3".into()),
            Some(&snapshot()),
        );
        assert_eq!(
            t.next,
            DialogState::AwaitingPayment {
                phone: "71234567890".into(),
                count_seats: 3
            }
        );
        assert_eq!(
            t.reply,
            DialogReply::PaymentInstructions {
                count_seats: 3,
                total_cash: 3000
            }
        );
        assert_eq!(
            t.effect,
            Some(DialogEffect::CreateBooking {
                phone: "71234567890".into(),
                count_seats: 3
            })
        );
    }

    #[test]
    fn test_seat_count_over_availability_reprompts() {
        let mut snap = snapshot();
        snap.seats_available = 2;
        let state = DialogState::AwaitingSeats {
            phone: "71234567890".into(),
        };
        let t = step(state.clone(), DialogInput::Text("5".into()), Some(&snap));
        assert_eq!(t.next, state);
        assert_eq!(t.reply, DialogReply::InsufficientSeats { available: 2 });
        assert!(t.effect.is_none());
    }

    #[test]
    fn test_garbage_seat_count_reprompts() {
        let state = DialogState::AwaitingSeats {
            phone: "71234567890".into(),
        };
        for text in ["zero", "-1", "0", "2.5", ""] {
            let t = step(
                state.clone(),
                DialogInput::Text(text.into()),
                Some(&snapshot()),
            );
            assert_eq!(t.next, state, "input {:?}", text);
            assert_eq!(t.reply, DialogReply::InvalidSeatCount);
        }
    }

    #[test]
    fn test_payment_file_completes_dialogue() {
        let t = step(
            DialogState::AwaitingPayment {
                phone: "71234567890".into(),
                count_seats: 3,
            },
            DialogInput::PaymentFile {
                filename: "receipt.pdf".into(),
            },
            Some(&snapshot()),
        );
        assert_eq!(t.next, DialogState::Done);
        assert_eq!(t.reply, DialogReply::PaymentReceived);
        assert_eq!(
            t.effect,
            Some(DialogEffect::AttachPayment {
                filename: "receipt.pdf".into()
            })
        );
    }

    #[test]
    fn test_unsupported_payment_file_reprompts() {
        let state = DialogState::AwaitingPayment {
            phone: "71234567890".into(),
            count_seats: 3,
        };
        let t = step(
            state.clone(),
            DialogInput::PaymentFile {
                filename: "notes.txt".into(),
            },
            Some(&snapshot()),
        );
        assert_eq!(t.next, state);
        assert_eq!(t.reply, DialogReply::UnsupportedFileFormat);
        assert!(t.effect.is_none());
    }

    #[test]
    fn test_text_during_payment_reprompts_for_file() {
        let state = DialogState::AwaitingPayment {
            phone: "71234567890".into(),
            count_seats: 1,
        };
        let t = step(
            state.clone(),
            DialogInput::Text("paid".into()),
            Some(&snapshot()),
        );
        assert_eq!(t.next, state);
        assert_eq!(t.reply, DialogReply::AskPaymentFile);
    }

    #[test]
    fn test_cancel_aborts_from_any_state() {
        for state in [
            DialogState::AwaitingContact,
            DialogState::AwaitingSeats {
                phone: "7".into(),
            },
            DialogState::AwaitingPayment {
                phone: "7".into(),
                count_seats: 1,
            },
        ] {
            let t = step(state, DialogInput::Cancel, Some(&snapshot()));
            assert_eq!(t.next, DialogState::Done);
            assert_eq!(t.reply, DialogReply::Cancelled);
            assert!(t.effect.is_none());
        }
    }
}
