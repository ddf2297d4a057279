//! Read-only collaborators consumed by the availability engine.
//!
//! Implementations own all I/O. Errors are reported as [`DependencyError`]
//! and passed through the engine untouched.

use uuid::Uuid;

use crate::error::DependencyError;
use crate::models::{BookingInterval, Resource, ResourceCategory, Span};

/// Source of bookable resources.
pub trait ResourceCatalog {
    /// All resources of a category, bookable or not.
    fn by_category(&self, category: ResourceCategory) -> Result<Vec<Resource>, DependencyError>;

    /// Look up a single resource.
    fn by_id(&self, id: Uuid) -> Result<Option<Resource>, DependencyError>;
}

/// Source of existing bookings.
pub trait BookingStore {
    /// Bookings on `resource_id` whose span overlaps `span`, in any status.
    fn overlapping(
        &self,
        resource_id: Uuid,
        span: &Span,
    ) -> Result<Vec<BookingInterval>, DependencyError>;
}

impl<T: ResourceCatalog + ?Sized> ResourceCatalog for &T {
    fn by_category(&self, category: ResourceCategory) -> Result<Vec<Resource>, DependencyError> {
        (**self).by_category(category)
    }

    fn by_id(&self, id: Uuid) -> Result<Option<Resource>, DependencyError> {
        (**self).by_id(id)
    }
}

impl<T: BookingStore + ?Sized> BookingStore for &T {
    fn overlapping(
        &self,
        resource_id: Uuid,
        span: &Span,
    ) -> Result<Vec<BookingInterval>, DependencyError> {
        (**self).overlapping(resource_id, span)
    }
}
