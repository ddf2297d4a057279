//! Dynamic pricing engine.
//!
//! Applies administered pricing rules to a base price and returns an
//! itemized quote. Everything below [`services`] is pure arithmetic over
//! [`rust_decimal::Decimal`]; the only I/O is the optional
//! [`RuleRepository`] fetch.

pub mod calculators;
pub mod holidays;
pub mod models;
pub mod repository;
pub mod requests;
pub mod responses;
pub mod rules;
pub mod services;

// Re-export commonly used items
pub use calculators::round_money;
pub use holidays::HolidayCalendar;
pub use models::{AdjustmentKind, PricingRule, PricingRuleRecord, RuleDefect, RuleType, Season};
pub use repository::{InMemoryRuleRepository, RuleRepository};
pub use requests::QuoteContext;
pub use responses::{AppliedAdjustment, PriceQuote, RuleDiagnostic};
pub use rules::RuleSet;
pub use services::PricingEngine;
