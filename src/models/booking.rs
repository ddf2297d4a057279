//! Booking intervals and the half-open span they occupy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, Result};

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct Span {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawSpan {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawSpan> for Span {
    type Error = EngineError;

    fn try_from(raw: RawSpan) -> Result<Self> {
        Span::new(raw.start, raw.end)
    }
}

impl Span {
    /// Fails with `InvalidRange` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(EngineError::invalid_range(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Lifecycle state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Tentative,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Whether a booking in this state consumes resource capacity.
    pub fn is_occupying(self) -> bool {
        matches!(
            self,
            BookingStatus::Tentative | BookingStatus::Confirmed | BookingStatus::Active
        )
    }
}

/// A booking placed on one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInterval {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub span: Span,
    pub status: BookingStatus,
    pub occupant_count: u32,
    /// Identifier carried over from the system a booking was imported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl BookingInterval {
    pub fn new(resource_id: Uuid, span: Span, status: BookingStatus, occupant_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource_id,
            span,
            status,
            occupant_count,
            external_id: None,
        }
    }

    pub fn is_occupying(&self) -> bool {
        self.status.is_occupying()
    }
}
