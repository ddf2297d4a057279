//! Category-wide occupancy snapshot.
//!
//! The percentage computed here is what callers hand to the pricing engine as
//! the current occupancy, so pricing never has to read live bookings itself.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{BookingInterval, ResourceCategory, Span};
use crate::pricing::round_money;

use super::collaborators::{BookingStore, ResourceCatalog};
use super::engine::AvailabilityEngine;

/// Occupancy of one category over a span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupancySnapshot {
    pub category: ResourceCategory,
    /// Sum of capacities of bookable resources
    pub total_capacity: u32,
    /// Sum over resources of their peak concurrent occupancy in the span
    pub occupied: u32,
    /// `occupied / total_capacity * 100`, two decimals; zero without capacity
    #[serde(with = "rust_decimal::serde::str")]
    pub percentage: Decimal,
    /// Peak occupied places per bookable resource, at most its capacity
    pub per_resource: BTreeMap<Uuid, u32>,
    /// How many resources carry at least one occupying booking
    pub resources_in_use: usize,
}

impl<C, B> AvailabilityEngine<C, B>
where
    C: ResourceCatalog,
    B: BookingStore,
{
    /// Snapshot of how full the bookable resources of `category` are over `span`.
    pub fn occupancy(&self, category: ResourceCategory, span: &Span) -> Result<OccupancySnapshot> {
        let mut total_capacity: u32 = 0;
        let mut occupied: u32 = 0;
        let mut per_resource = BTreeMap::new();

        for resource in self.catalog.by_category(category)? {
            if !resource.is_bookable() {
                continue;
            }
            let bookings = self.occupying_bookings(resource.id, span, None)?;
            let count = peak_concurrent(&bookings, span).min(resource.capacity_max_occupants);
            total_capacity = total_capacity.saturating_add(resource.capacity_max_occupants);
            occupied = occupied.saturating_add(count);
            per_resource.insert(resource.id, count);
        }

        let percentage = occupancy_percentage(occupied, total_capacity);
        let resources_in_use = per_resource.values().filter(|count| **count > 0).count();

        info!(
            "Occupancy for {:?}: {}/{} ({}%) across {} resources",
            category,
            occupied,
            total_capacity,
            percentage,
            per_resource.len()
        );

        Ok(OccupancySnapshot {
            category,
            total_capacity,
            occupied,
            percentage,
            per_resource,
            resources_in_use,
        })
    }
}

/// Largest number of occupants present at the same instant within `span`.
///
/// Spans are half-open, so a stay ending when another starts never counts
/// alongside it.
pub(crate) fn peak_concurrent(bookings: &[BookingInterval], span: &Span) -> u32 {
    let mut events: Vec<(DateTime<Utc>, bool, u32)> = Vec::with_capacity(bookings.len() * 2);
    for booking in bookings {
        let start = booking.span.start().max(span.start());
        let end = booking.span.end().min(span.end());
        if start < end {
            events.push((start, true, booking.occupant_count));
            events.push((end, false, booking.occupant_count));
        }
    }
    // Departures (false) sort before arrivals at the same instant
    events.sort_by_key(|(at, arriving, _)| (*at, *arriving));

    let mut current: u32 = 0;
    let mut peak: u32 = 0;
    for (_, arriving, occupants) in events {
        if arriving {
            current = current.saturating_add(occupants);
            peak = peak.max(current);
        } else {
            current = current.saturating_sub(occupants);
        }
    }
    peak
}

/// Percentage of `capacity` taken by `occupied`, rounded to two places.
pub fn occupancy_percentage(occupied: u32, capacity: u32) -> Decimal {
    if capacity == 0 {
        return Decimal::ZERO;
    }
    round_money(Decimal::from(occupied) * dec!(100) / Decimal::from(capacity), 2)
}
