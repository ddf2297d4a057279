//! Capacity-aware availability search.
//!
//! A resource can take a party when the occupant count of the occupying
//! bookings overlapping the requested span, plus the party size, stays within
//! the resource's capacity. The check is advisory: a booking workflow must
//! re-run [`AvailabilityEngine::is_available`] inside the same serialized
//! section that commits the booking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calendar::Normalizer;
use crate::error::{EngineError, Result};
use crate::models::{BookingInterval, Resource, ResourceCategory, Span};

use super::collaborators::{BookingStore, ResourceCatalog};

/// Search request over calendar dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub category: ResourceCategory,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub party_size: u32,
    /// Booking being edited in place; its own occupants are not counted
    #[serde(default)]
    pub exclude_booking_id: Option<Uuid>,
}

/// One eligible resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub resource_id: Uuid,
    /// Occupants already booked over the requested span
    pub current_occupancy: u32,
    /// Places left before the requesting party is added
    pub remaining_capacity: u32,
}

/// Outcome of a single-resource check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvailabilityCheck {
    pub available: bool,
    pub occupying_count: u32,
    pub capacity: u32,
}

pub struct AvailabilityEngine<C, B> {
    pub(crate) catalog: C,
    pub(crate) bookings: B,
    pub(crate) normalizer: Normalizer,
}

impl<C, B> AvailabilityEngine<C, B>
where
    C: ResourceCatalog,
    B: BookingStore,
{
    pub fn new(catalog: C, bookings: B, normalizer: Normalizer) -> Self {
        Self {
            catalog,
            bookings,
            normalizer,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Eligible resources of the query's category, fullest first.
    ///
    /// Ordered by ascending remaining capacity, then by resource id, so
    /// parties are consolidated into resources that already have guests.
    pub fn find_available(&self, query: &AvailabilityQuery) -> Result<Vec<AvailabilityResult>> {
        let span = self.normalizer.stay_span(query.start_date, query.end_date)?;
        validate_party_size(query.party_size)?;

        let candidates: Vec<Resource> = self
            .catalog
            .by_category(query.category)
            .map_err(|e| {
                warn!("Resource lookup for {:?} failed: {}", query.category, e);
                e
            })?
            .into_iter()
            .filter(Resource::is_bookable)
            .collect();

        let mut results = Vec::with_capacity(candidates.len());
        for resource in &candidates {
            let occupied = self.occupying_count(resource.id, &span, query.exclude_booking_id)?;
            let fits = fits(occupied, query.party_size, resource.capacity_max_occupants);
            debug!(
                resource_id = %resource.id,
                occupied,
                capacity = resource.capacity_max_occupants,
                fits,
                "availability candidate"
            );
            if fits {
                results.push(AvailabilityResult {
                    resource_id: resource.id,
                    current_occupancy: occupied,
                    remaining_capacity: resource.capacity_max_occupants - occupied,
                });
            }
        }

        results.sort_by(|a, b| {
            a.remaining_capacity
                .cmp(&b.remaining_capacity)
                .then_with(|| a.resource_id.cmp(&b.resource_id))
        });

        info!(
            "Availability for {:?} {}..{} party of {}: {} of {} candidates eligible",
            query.category,
            query.start_date,
            query.end_date,
            query.party_size,
            results.len(),
            candidates.len()
        );

        Ok(results)
    }

    /// Whether `resource_id` can take `party_size` more occupants over `span`.
    pub fn is_available(
        &self,
        resource_id: Uuid,
        span: &Span,
        party_size: u32,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<bool> {
        Ok(self.check(resource_id, span, party_size, exclude_booking_id)?.available)
    }

    /// Like [`is_available`](Self::is_available), reporting the counts it used.
    pub fn check(
        &self,
        resource_id: Uuid,
        span: &Span,
        party_size: u32,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<AvailabilityCheck> {
        validate_party_size(party_size)?;

        let resource = self
            .catalog
            .by_id(resource_id)?
            .ok_or(EngineError::UnknownResource(resource_id))?;

        let occupying_count = self.occupying_count(resource_id, span, exclude_booking_id)?;
        let available = resource.is_bookable()
            && fits(occupying_count, party_size, resource.capacity_max_occupants);

        debug!(
            %resource_id,
            occupying_count,
            party_size,
            capacity = resource.capacity_max_occupants,
            bookable = resource.is_bookable(),
            available,
            "availability check"
        );

        Ok(AvailabilityCheck {
            available,
            occupying_count,
            capacity: resource.capacity_max_occupants,
        })
    }

    /// Sum of occupants of occupying bookings overlapping `span`.
    pub(crate) fn occupying_count(
        &self,
        resource_id: Uuid,
        span: &Span,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<u32> {
        Ok(self
            .occupying_bookings(resource_id, span, exclude_booking_id)?
            .iter()
            .fold(0u32, |acc, b| acc.saturating_add(b.occupant_count)))
    }

    /// Occupying bookings on `resource_id` that overlap `span`.
    pub(crate) fn occupying_bookings(
        &self,
        resource_id: Uuid,
        span: &Span,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<Vec<BookingInterval>> {
        let overlapping = self
            .bookings
            .overlapping(resource_id, span)
            .map_err(|e| {
                warn!("Booking lookup for {} failed: {}", resource_id, e);
                e
            })?;
        Ok(overlapping
            .into_iter()
            .filter(|b| b.resource_id == resource_id)
            .filter(|b| b.is_occupying())
            .filter(|b| b.span.overlaps(span))
            .filter(|b| Some(b.id) != exclude_booking_id)
            .collect())
    }
}

fn validate_party_size(party_size: u32) -> Result<()> {
    if party_size == 0 {
        return Err(EngineError::invalid_input("party size must be positive"));
    }
    Ok(())
}

fn fits(occupied: u32, party_size: u32, capacity: u32) -> bool {
    u64::from(occupied) + u64::from(party_size) <= u64::from(capacity)
}
