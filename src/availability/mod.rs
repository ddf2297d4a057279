//! Availability engine.
//!
//! Resolves which bookable resources of a category can take a party for a
//! date range, reading the resource catalog and booking store through the
//! read-only collaborator traits in [`collaborators`].

pub mod collaborators;
pub mod engine;
pub mod memory;
pub mod occupancy;

// Re-export commonly used items
pub use collaborators::{BookingStore, ResourceCatalog};
pub use engine::{AvailabilityEngine, AvailabilityQuery, AvailabilityResult};
pub use memory::{InMemoryBookingStore, InMemoryCatalog};
pub use occupancy::OccupancySnapshot;
