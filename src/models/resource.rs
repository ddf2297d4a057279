//! Bookable resources and the categories they are offered under.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, Result};

/// Kind of bookable resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    StandardSuite,
    StandardPlusSuite,
    VipSuite,
    GroomingStation,
    TrainingRoom,
    DaycareRoom,
}

/// Service a booking is sold under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Boarding,
    Daycare,
    Grooming,
    Training,
}

/// Resource as published by the catalog. Read-only to the engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawResource")]
pub struct Resource {
    pub id: Uuid,
    pub name: Option<String>,
    pub category: ResourceCategory,
    /// At least one
    pub capacity_max_occupants: u32,
    pub maintenance_hold: bool,
    pub active: bool,
}

#[derive(Deserialize)]
struct RawResource {
    id: Uuid,
    #[serde(default)]
    name: Option<String>,
    category: ResourceCategory,
    capacity_max_occupants: u32,
    #[serde(default)]
    maintenance_hold: bool,
    #[serde(default = "default_true")]
    active: bool,
}

fn default_true() -> bool {
    true
}

impl TryFrom<RawResource> for Resource {
    type Error = EngineError;

    fn try_from(raw: RawResource) -> Result<Self> {
        if raw.capacity_max_occupants == 0 {
            return Err(EngineError::invalid_input(format!(
                "resource {} must hold at least one occupant",
                raw.id
            )));
        }
        Ok(Self {
            id: raw.id,
            name: raw.name,
            category: raw.category,
            capacity_max_occupants: raw.capacity_max_occupants,
            maintenance_hold: raw.maintenance_hold,
            active: raw.active,
        })
    }
}

impl Resource {
    pub fn new(id: Uuid, category: ResourceCategory, capacity_max_occupants: u32) -> Self {
        Self {
            id,
            name: None,
            category,
            capacity_max_occupants,
            maintenance_hold: false,
            active: true,
        }
    }

    /// Active and not held for maintenance.
    pub fn is_bookable(&self) -> bool {
        self.active && !self.maintenance_hold
    }
}
