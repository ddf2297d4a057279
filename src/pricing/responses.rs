//! Output types for pricing.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::models::Season;

/// One applied rule in a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedAdjustment {
    pub rule_id: Uuid,
    pub rule_name: String,
    /// Signed, unrounded contribution
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub reason: String,
}

/// A rule that could not be used, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDiagnostic {
    pub rule_id: Uuid,
    pub rule_name: String,
    pub message: String,
}

/// Itemized price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    /// In application order
    pub adjustments: Vec<AppliedAdjustment>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_adjustment: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price: Decimal,
    pub season: Season,
    pub lead_days: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<RuleDiagnostic>,
}
