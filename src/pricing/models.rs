//! Pricing rule models.
//!
//! Rules arrive as [`PricingRuleRecord`]s, shaped the way rule
//! administration stores them, with every type-specific parameter optional.
//! Each record is converted into a typed [`PricingRule`] whose [`RuleKind`]
//! carries exactly the parameters its type needs.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ResourceCategory, ServiceCategory};

/// Rule type tag as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Seasonal,
    PeakTime,
    CapacityBased,
    SpecialEvent,
    AdvanceBooking,
    LastMinute,
}

/// How the adjustment value is applied to the base price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// `value` percent of the base price
    Percentage,
    /// `value` in currency units
    FixedAmount,
}

/// Meteorological season of a check-in date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

/// Pricing rule row as administered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRuleRecord {
    pub id: Uuid,
    pub name: String,
    pub rule_type: RuleType,
    #[serde(default)]
    pub priority: i32,
    pub adjustment_kind: AdjustmentKind,
    pub adjustment_value: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,

    // Applicability filters (empty set = any)
    #[serde(default)]
    pub service_categories: Vec<ServiceCategory>,
    #[serde(default)]
    pub resource_categories: Vec<ResourceCategory>,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,

    // Type-specific parameters
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub weekend: Option<bool>,
    #[serde(default)]
    pub holiday: Option<bool>,
    #[serde(default)]
    pub days_of_week: Option<Vec<Weekday>>,
    #[serde(default)]
    pub min_occupancy_pct: Option<Decimal>,
    #[serde(default)]
    pub max_occupancy_pct: Option<Decimal>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_start: Option<NaiveDate>,
    #[serde(default)]
    pub event_end: Option<NaiveDate>,
    #[serde(default)]
    pub min_days_in_advance: Option<i64>,
    #[serde(default)]
    pub max_days_in_advance: Option<i64>,
}

fn default_true() -> bool {
    true
}

impl PricingRuleRecord {
    /// Active record with no filters and no type parameters set.
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        rule_type: RuleType,
        adjustment_kind: AdjustmentKind,
        adjustment_value: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            rule_type,
            priority: 0,
            adjustment_kind,
            adjustment_value,
            is_active: true,
            service_categories: Vec::new(),
            resource_categories: Vec::new(),
            valid_from: None,
            valid_until: None,
            season: None,
            weekend: None,
            holiday: None,
            days_of_week: None,
            min_occupancy_pct: None,
            max_occupancy_pct: None,
            event_name: None,
            event_start: None,
            event_end: None,
            min_days_in_advance: None,
            max_days_in_advance: None,
        }
    }
}

/// Why a record cannot be turned into a rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleDefect {
    #[error("{rule_type:?} rule is missing required parameter '{parameter}'")]
    MissingParameter {
        rule_type: RuleType,
        parameter: &'static str,
    },

    #[error("occupancy range [{min}%, {max}%) must satisfy 0 <= min < max")]
    InvalidOccupancyRange { min: Decimal, max: Decimal },

    #[error("event window ends ({end}) before it starts ({start})")]
    InvalidEventWindow { start: NaiveDate, end: NaiveDate },

    #[error("peak-time rule matches nothing: no weekend flag, holiday flag or days")]
    EmptyPeakCriteria,

    #[error("validity window ends ({until}) before it starts ({from})")]
    InvalidValidityWindow { from: NaiveDate, until: NaiveDate },

    #[error("'{parameter}' must not be negative, got {value}")]
    NegativeLeadTime { parameter: &'static str, value: i64 },
}

/// Type-specific predicate parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    Seasonal {
        season: Season,
    },
    PeakTime {
        weekend: bool,
        holiday: bool,
        days: Vec<Weekday>,
    },
    CapacityBased {
        min_pct: Decimal,
        max_pct: Decimal,
    },
    SpecialEvent {
        name: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    AdvanceBooking {
        min_days: i64,
    },
    LastMinute {
        max_days: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub kind: AdjustmentKind,
    pub value: Decimal,
}

/// Applicability filters shared by every rule type
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleFilters {
    pub service_categories: BTreeSet<ServiceCategory>,
    pub resource_categories: BTreeSet<ResourceCategory>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

impl RuleFilters {
    /// Category membership (empty set admits all) and validity window, both inclusive.
    pub fn admits(
        &self,
        service: ServiceCategory,
        resource: ResourceCategory,
        check_in: NaiveDate,
    ) -> bool {
        if !self.service_categories.is_empty() && !self.service_categories.contains(&service) {
            return false;
        }
        if !self.resource_categories.is_empty() && !self.resource_categories.contains(&resource) {
            return false;
        }
        if self.valid_from.is_some_and(|from| check_in < from) {
            return false;
        }
        if self.valid_until.is_some_and(|until| check_in > until) {
            return false;
        }
        true
    }
}

/// Validated pricing rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingRule {
    pub id: Uuid,
    pub name: String,
    pub priority: i32,
    pub adjustment: Adjustment,
    pub filters: RuleFilters,
    pub kind: RuleKind,
}

impl TryFrom<PricingRuleRecord> for PricingRule {
    type Error = RuleDefect;

    fn try_from(record: PricingRuleRecord) -> Result<Self, Self::Error> {
        if let (Some(from), Some(until)) = (record.valid_from, record.valid_until) {
            if until < from {
                return Err(RuleDefect::InvalidValidityWindow { from, until });
            }
        }

        let rule_type = record.rule_type;
        let missing =
            |parameter: &'static str| RuleDefect::MissingParameter { rule_type, parameter };

        let kind = match rule_type {
            RuleType::Seasonal => RuleKind::Seasonal {
                season: record.season.ok_or_else(|| missing("season"))?,
            },
            RuleType::PeakTime => {
                let weekend = record.weekend.unwrap_or(false);
                let holiday = record.holiday.unwrap_or(false);
                let days = record.days_of_week.clone().unwrap_or_default();
                if !weekend && !holiday && days.is_empty() {
                    return Err(RuleDefect::EmptyPeakCriteria);
                }
                RuleKind::PeakTime { weekend, holiday, days }
            }
            RuleType::CapacityBased => {
                let min = record.min_occupancy_pct.ok_or_else(|| missing("min_occupancy_pct"))?;
                let max = record.max_occupancy_pct.ok_or_else(|| missing("max_occupancy_pct"))?;
                if min < Decimal::ZERO || min >= max {
                    return Err(RuleDefect::InvalidOccupancyRange { min, max });
                }
                RuleKind::CapacityBased {
                    min_pct: min,
                    max_pct: max,
                }
            }
            RuleType::SpecialEvent => {
                let name = record
                    .event_name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| missing("event_name"))?;
                let start = record.event_start.ok_or_else(|| missing("event_start"))?;
                let end = record.event_end.ok_or_else(|| missing("event_end"))?;
                if end < start {
                    return Err(RuleDefect::InvalidEventWindow { start, end });
                }
                RuleKind::SpecialEvent { name, start, end }
            }
            RuleType::AdvanceBooking => {
                let min_days = record
                    .min_days_in_advance
                    .ok_or_else(|| missing("min_days_in_advance"))?;
                if min_days < 0 {
                    return Err(RuleDefect::NegativeLeadTime {
                        parameter: "min_days_in_advance",
                        value: min_days,
                    });
                }
                RuleKind::AdvanceBooking { min_days }
            }
            RuleType::LastMinute => {
                let max_days = record
                    .max_days_in_advance
                    .ok_or_else(|| missing("max_days_in_advance"))?;
                if max_days < 0 {
                    return Err(RuleDefect::NegativeLeadTime {
                        parameter: "max_days_in_advance",
                        value: max_days,
                    });
                }
                RuleKind::LastMinute { max_days }
            }
        };

        Ok(PricingRule {
            id: record.id,
            name: record.name,
            priority: record.priority,
            adjustment: Adjustment {
                kind: record.adjustment_kind,
                value: record.adjustment_value,
            },
            filters: RuleFilters {
                service_categories: record.service_categories.into_iter().collect(),
                resource_categories: record.resource_categories.into_iter().collect(),
                valid_from: record.valid_from,
                valid_until: record.valid_until,
            },
            kind,
        })
    }
}
