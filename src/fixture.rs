//! JSON fixture files: a resort's resources, bookings and pricing rules in
//! one document, loaded into the in-memory collaborators.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::availability::{InMemoryBookingStore, InMemoryCatalog};
use crate::models::{BookingInterval, Resource};
use crate::pricing::{InMemoryRuleRepository, PricingRuleRecord};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("cannot read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub bookings: Vec<BookingInterval>,
    /// Registration order is the order in the file
    #[serde(default)]
    pub rules: Vec<PricingRuleRecord>,
}

impl Fixture {
    pub fn from_json(text: &str) -> Result<Self, FixtureError> {
        let fixture: Fixture = serde_json::from_str(text)?;
        fixture.report_orphans();
        Ok(fixture)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fixture = Self::from_json(&text)?;
        info!(
            "Loaded fixture {}: {} resources, {} bookings, {} rules",
            path.display(),
            fixture.resources.len(),
            fixture.bookings.len(),
            fixture.rules.len()
        );
        Ok(fixture)
    }

    pub fn catalog(&self) -> InMemoryCatalog {
        InMemoryCatalog::with_resources(self.resources.clone())
    }

    pub fn booking_store(&self) -> InMemoryBookingStore {
        InMemoryBookingStore::with_bookings(self.bookings.iter().cloned())
    }

    pub fn rule_repository(&self) -> InMemoryRuleRepository {
        InMemoryRuleRepository::new(self.rules.clone())
    }

    /// Bookings on resources the fixture does not list are kept but can
    /// never affect a search.
    fn report_orphans(&self) {
        let known: HashSet<_> = self.resources.iter().map(|r| r.id).collect();
        for booking in self.bookings.iter().filter(|b| !known.contains(&b.resource_id)) {
            warn!(
                booking_id = %booking.id,
                resource_id = %booking.resource_id,
                "booking references a resource missing from the fixture"
            );
        }
    }
}
