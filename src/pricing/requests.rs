//! Input types for pricing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ResourceCategory, ServiceCategory};

/// Everything about a stay that pricing rules can look at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteContext {
    pub service_category: ServiceCategory,
    pub resource_category: ResourceCategory,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    /// Date the booking is (being) made, for lead-time rules
    pub booking_date: NaiveDate,
    /// Computed once by the caller from an occupancy snapshot
    #[serde(default)]
    pub current_occupancy_percentage: Decimal,
}
