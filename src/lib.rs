//! Availability and dynamic pricing engine for a pet boarding resort.
//!
//! Two engines share one data model:
//!
//! - [`availability::AvailabilityEngine`] finds resources (suites, grooming
//!   stations, rooms) that can take a party over a range of calendar dates
//!   without exceeding their occupant capacity.
//! - [`pricing::PricingEngine`] applies administered pricing rules to a base
//!   price and returns an itemized, deterministic quote.
//!
//! Storage is behind small read-only traits ([`availability::ResourceCatalog`],
//! [`availability::BookingStore`], [`pricing::RuleRepository`]); in-memory
//! implementations are provided.

pub mod availability;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod error;
pub mod fixture;
pub mod models;
pub mod pricing;

pub use availability::{
    AvailabilityEngine, AvailabilityQuery, AvailabilityResult, OccupancySnapshot,
};
pub use calendar::Normalizer;
pub use config::EngineConfig;
pub use error::{DependencyError, EngineError, Result};
pub use pricing::{PriceQuote, PricingEngine, QuoteContext, RuleSet};
