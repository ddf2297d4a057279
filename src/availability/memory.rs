//! In-memory collaborators.
//!
//! Used by the command-line harness (loaded from a fixture file) and by tests.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::DependencyError;
use crate::models::{BookingInterval, Resource, ResourceCategory, Span};

use super::collaborators::{BookingStore, ResourceCatalog};

/// Resource catalog held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    resources: Vec<Resource>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    /// Add a resource, replacing any existing one with the same id.
    pub fn insert(&mut self, resource: Resource) {
        match self.resources.iter_mut().find(|r| r.id == resource.id) {
            Some(existing) => *existing = resource,
            None => self.resources.push(resource),
        }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }
}

impl ResourceCatalog for InMemoryCatalog {
    fn by_category(&self, category: ResourceCategory) -> Result<Vec<Resource>, DependencyError> {
        Ok(self
            .resources
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect())
    }

    fn by_id(&self, id: Uuid) -> Result<Option<Resource>, DependencyError> {
        Ok(self.resources.iter().find(|r| r.id == id).cloned())
    }
}

/// Booking store held in memory.
///
/// Per resource, bookings are kept sorted by `span.start` so an overlap
/// query can stop at the first booking starting at or after the query end.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    by_resource: HashMap<Uuid, Vec<BookingInterval>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bookings(bookings: impl IntoIterator<Item = BookingInterval>) -> Self {
        let mut store = Self::new();
        for booking in bookings {
            store.insert(booking);
        }
        store
    }

    /// Insert a booking maintaining sort order by start.
    pub fn insert(&mut self, booking: BookingInterval) {
        let list = self.by_resource.entry(booking.resource_id).or_default();
        let pos = list.partition_point(|b| b.span.start() <= booking.span.start());
        list.insert(pos, booking);
    }

    /// Remove a booking by id.
    pub fn remove(&mut self, id: Uuid) -> Option<BookingInterval> {
        for list in self.by_resource.values_mut() {
            if let Some(pos) = list.iter().position(|b| b.id == id) {
                return Some(list.remove(pos));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.by_resource.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookingInterval> {
        self.by_resource.values().flatten()
    }
}

impl BookingStore for InMemoryBookingStore {
    fn overlapping(
        &self,
        resource_id: Uuid,
        span: &Span,
    ) -> Result<Vec<BookingInterval>, DependencyError> {
        let Some(list) = self.by_resource.get(&resource_id) else {
            return Ok(Vec::new());
        };
        // Everything at index >= right_bound starts at or after span.end
        let right_bound = list.partition_point(|b| b.span.start() < span.end());
        Ok(list[..right_bound]
            .iter()
            .filter(|b| b.span.end() > span.start())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::{TimeZone, Utc};

    fn span(from: u32, to: u32) -> Span {
        Span::new(
            Utc.with_ymd_and_hms(2024, 10, from, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 10, to, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_overlapping_skips_past_and_future() {
        let resource = Uuid::new_v4();
        let store = InMemoryBookingStore::with_bookings([
            BookingInterval::new(resource, span(1, 3), BookingStatus::Confirmed, 1),
            BookingInterval::new(resource, span(4, 8), BookingStatus::Confirmed, 1),
            BookingInterval::new(resource, span(10, 12), BookingStatus::Confirmed, 1),
        ]);

        let hits = store.overlapping(resource, &span(5, 10)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].span, span(4, 8));
    }

    #[test]
    fn test_overlapping_adjacent_not_included() {
        let resource = Uuid::new_v4();
        let store = InMemoryBookingStore::with_bookings([BookingInterval::new(
            resource,
            span(1, 5),
            BookingStatus::Active,
            1,
        )]);
        assert!(store.overlapping(resource, &span(5, 7)).unwrap().is_empty());
        assert!(store.overlapping(Uuid::new_v4(), &span(1, 7)).unwrap().is_empty());
    }

    #[test]
    fn test_insert_keeps_order_and_remove() {
        let resource = Uuid::new_v4();
        let mut store = InMemoryBookingStore::new();
        let late = BookingInterval::new(resource, span(20, 22), BookingStatus::Confirmed, 1);
        let early = BookingInterval::new(resource, span(2, 4), BookingStatus::Confirmed, 1);
        let late_id = late.id;
        store.insert(late);
        store.insert(early);

        let all = store.overlapping(resource, &span(1, 30)).unwrap();
        assert_eq!(all[0].span, span(2, 4));
        assert_eq!(all[1].span, span(20, 22));

        assert!(store.remove(late_id).is_some());
        assert!(store.remove(late_id).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_catalog_by_category_and_replace() {
        let id = Uuid::new_v4();
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(Resource::new(id, ResourceCategory::VipSuite, 2));
        catalog.insert(Resource::new(Uuid::new_v4(), ResourceCategory::TrainingRoom, 6));
        catalog.insert(Resource::new(id, ResourceCategory::VipSuite, 4));

        let suites = catalog.by_category(ResourceCategory::VipSuite).unwrap();
        assert_eq!(suites.len(), 1);
        assert_eq!(suites[0].capacity_max_occupants, 4);
        assert!(catalog.by_id(Uuid::new_v4()).unwrap().is_none());
    }
}
