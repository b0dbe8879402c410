//! Repository implementations.

pub mod booking;
pub mod event;
pub mod link;

pub use booking::BookingRepository;
pub use event::EventRepository;
pub use link::LinkRepository;
