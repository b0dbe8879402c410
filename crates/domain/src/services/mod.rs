//! Domain services for the event-booking backend.
//!
//! Services contain business logic that operates on domain models.

pub mod dialog;
pub mod ledger;

pub use dialog::{DialogEffect, DialogInput, DialogReply, DialogState, EventSnapshot, Transition};
pub use ledger::{check_reservation, seats_available};
