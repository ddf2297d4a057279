//! Shared data model for both engines.

pub mod booking;
pub mod resource;

pub use booking::{BookingInterval, BookingStatus, Span};
pub use resource::{Resource, ResourceCategory, ServiceCategory};
