//! Domain models for the event-booking backend.

pub mod booking;
pub mod event;
pub mod link;

pub use booking::{
    Booking, BookingPatch, BookingResponse, BookingState, CreateBookingRequest,
    CreatedBookingResponse,
};
pub use event::{CreateEventRequest, Event, EventPatch, EventResponse};
pub use link::{ConfirmationLinkResponse, OneTimeLink, RedeemedSeats};
