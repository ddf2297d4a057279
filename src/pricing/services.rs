//! Pricing engine.
//!
//! [`PricingEngine::quote`] is a pure function of its arguments: it does no
//! I/O, mutates nothing, and gives identical output for identical input.
//! [`PricingEngine::quote_from_repository`] adds the one collaborator call
//! needed to fetch rules first.

use std::cmp::Reverse;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calendar::{day_of_week, days_between, is_weekend};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

use super::calculators::{adjustment_amount, describe_adjustment, final_price, season_of};
use super::holidays::HolidayCalendar;
use super::models::{PricingRule, RuleKind, Season};
use super::repository::RuleRepository;
use super::requests::QuoteContext;
use super::responses::{AppliedAdjustment, PriceQuote, RuleDiagnostic};
use super::rules::RuleSet;

/// Facts derived once from the context and shared by every rule predicate
#[derive(Debug, Clone, Copy)]
struct StayFacts {
    check_in: NaiveDate,
    season: Season,
    lead_days: i64,
    weekday: Weekday,
    weekend: bool,
    holiday: bool,
    occupancy_pct: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    holidays: HolidayCalendar,
}

impl PricingEngine {
    pub fn new(holidays: HolidayCalendar) -> Self {
        Self { holidays }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.holidays.clone())
    }

    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    /// Price a stay.
    ///
    /// Matching rules apply by priority descending, then registration order.
    /// Adjustments accumulate unrounded; the final price is rounded once to
    /// two places and never drops below zero. Rules rejected while building
    /// `rules` are carried into the quote's diagnostics.
    pub fn quote(
        &self,
        base_price: Decimal,
        context: &QuoteContext,
        rules: &RuleSet,
    ) -> Result<PriceQuote> {
        validate(base_price, context)?;

        let facts = self.facts(context);

        let mut matched: Vec<(usize, &PricingRule, String)> = rules
            .applicable_to(context)
            .filter_map(|(seq, rule)| {
                let reason = self.match_reason(&rule.kind, &facts);
                debug!(
                    rule_id = %rule.id,
                    rule = %rule.name,
                    priority = rule.priority,
                    matched = reason.is_some(),
                    "pricing rule evaluated"
                );
                reason.map(|reason| (seq, rule, reason))
            })
            .collect();

        matched.sort_by_key(|(seq, rule, _)| (Reverse(rule.priority), *seq));

        let mut diagnostics = rules.diagnostics().to_vec();
        let mut total_adjustment = Decimal::ZERO;
        let mut adjustments = Vec::with_capacity(matched.len());
        for (_, rule, reason) in matched {
            // The running price must stay representable for the final sum
            let next_total = adjustment_amount(base_price, &rule.adjustment)
                .and_then(|amount| Some((amount, total_adjustment.checked_add(amount)?)))
                .filter(|(_, total)| base_price.checked_add(*total).is_some());
            let Some((amount, next_total)) = next_total else {
                warn!(
                    "Skipping pricing rule {} ({}): adjustment overflows the price",
                    rule.id, rule.name
                );
                diagnostics.push(RuleDiagnostic {
                    rule_id: rule.id,
                    rule_name: rule.name.clone(),
                    message: format!(
                        "adjustment {} on base {} overflows the price",
                        describe_adjustment(&rule.adjustment),
                        base_price
                    ),
                });
                continue;
            };
            total_adjustment = next_total;
            adjustments.push(AppliedAdjustment {
                rule_id: rule.id,
                rule_name: rule.name.clone(),
                amount,
                reason: format!("{} ({})", reason, describe_adjustment(&rule.adjustment)),
            });
        }

        let final_price = final_price(base_price, total_adjustment).ok_or_else(|| {
            EngineError::invalid_input(format!("base price {base_price} is out of range"))
        })?;

        info!(
            "Quoted {} -> {} with {} adjustments ({} rules skipped)",
            base_price,
            final_price,
            adjustments.len(),
            diagnostics.len()
        );

        Ok(PriceQuote {
            base_price,
            adjustments,
            total_adjustment,
            final_price,
            season: facts.season,
            lead_days: facts.lead_days,
            diagnostics,
        })
    }

    /// Fetch rules for `context` from `repository`, then [`quote`](Self::quote).
    ///
    /// Input is validated before the repository is consulted. Repository
    /// failures surface as [`EngineError::Dependency`].
    pub fn quote_from_repository<R>(
        &self,
        repository: &R,
        base_price: Decimal,
        context: &QuoteContext,
    ) -> Result<PriceQuote>
    where
        R: RuleRepository + ?Sized,
    {
        validate(base_price, context)?;
        let records = repository.active_rules_for(context).map_err(|e| {
            warn!("Rule lookup failed: {}", e);
            e
        })?;
        let rules = RuleSet::from_records(records);
        self.quote(base_price, context, &rules)
    }

    fn facts(&self, context: &QuoteContext) -> StayFacts {
        let check_in = context.check_in_date;
        StayFacts {
            check_in,
            season: season_of(check_in),
            lead_days: days_between(context.booking_date, check_in),
            weekday: day_of_week(check_in),
            weekend: is_weekend(check_in),
            holiday: self.holidays.is_holiday(check_in),
            occupancy_pct: context.current_occupancy_percentage,
        }
    }

    /// Why the rule's type predicate holds, or `None` if it does not.
    fn match_reason(&self, kind: &RuleKind, facts: &StayFacts) -> Option<String> {
        match kind {
            RuleKind::Seasonal { season } => {
                (*season == facts.season).then(|| format!("{} season", season.label()))
            }
            RuleKind::PeakTime { weekend, holiday, days } => {
                if *weekend && facts.weekend {
                    Some("Weekend check-in".to_string())
                } else if *holiday && facts.holiday {
                    Some("Holiday check-in".to_string())
                } else if days.contains(&facts.weekday) {
                    Some(format!("Peak day ({})", facts.weekday))
                } else {
                    None
                }
            }
            RuleKind::CapacityBased { min_pct, max_pct } => {
                (*min_pct <= facts.occupancy_pct && facts.occupancy_pct < *max_pct).then(|| {
                    format!(
                        "Occupancy {}% within [{}%, {}%)",
                        facts.occupancy_pct.normalize(),
                        min_pct.normalize(),
                        max_pct.normalize()
                    )
                })
            }
            RuleKind::SpecialEvent { name, start, end } => {
                (*start <= facts.check_in && facts.check_in <= *end)
                    .then(|| format!("Event: {name}"))
            }
            RuleKind::AdvanceBooking { min_days } => (facts.lead_days >= *min_days)
                .then(|| format!("Booked {} days ahead (at least {})", facts.lead_days, min_days)),
            RuleKind::LastMinute { max_days } => (facts.lead_days <= *max_days)
                .then(|| format!("Booked {} days ahead (at most {})", facts.lead_days, max_days)),
        }
    }
}

fn validate(base_price: Decimal, context: &QuoteContext) -> Result<()> {
    if base_price.is_sign_negative() && !base_price.is_zero() {
        return Err(EngineError::invalid_input(format!(
            "base price must not be negative, got {base_price}"
        )));
    }
    if context.check_out_date < context.check_in_date {
        return Err(EngineError::invalid_range(
            context.check_in_date,
            context.check_out_date,
        ));
    }
    Ok(())
}
