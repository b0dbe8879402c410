//! Entity definitions (database row mappings).

pub mod booking;
pub mod event;
pub mod link;

pub use booking::BookingEntity;
pub use event::EventEntity;
pub use link::LinkEntity;
