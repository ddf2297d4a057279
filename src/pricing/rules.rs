//! Ordered, filterable collection of pricing rules.

use tracing::warn;

use super::models::{PricingRule, PricingRuleRecord};
use super::requests::QuoteContext;
use super::responses::RuleDiagnostic;

/// Rules in registration order, plus diagnostics for records that were rejected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<PricingRule>,
    diagnostics: Vec<RuleDiagnostic>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register records in the order given.
    ///
    /// Inactive records are dropped. Malformed ones are dropped and reported
    /// through [`diagnostics`](Self::diagnostics).
    pub fn from_records(records: impl IntoIterator<Item = PricingRuleRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            if !record.is_active {
                continue;
            }
            let (rule_id, rule_name) = (record.id, record.name.clone());
            match PricingRule::try_from(record) {
                Ok(rule) => set.push(rule),
                Err(defect) => {
                    warn!("Skipping pricing rule {} ({}): {}", rule_id, rule_name, defect);
                    set.diagnostics.push(RuleDiagnostic {
                        rule_id,
                        rule_name,
                        message: defect.to_string(),
                    });
                }
            }
        }
        set
    }

    /// Register a rule after all existing ones.
    pub fn push(&mut self, rule: PricingRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PricingRule> {
        self.rules.iter()
    }

    /// Rules whose category and validity filters admit the context, with
    /// their registration index.
    pub fn applicable_to<'a>(
        &'a self,
        context: &'a QuoteContext,
    ) -> impl Iterator<Item = (usize, &'a PricingRule)> + 'a {
        self.rules.iter().enumerate().filter(move |(_, rule)| {
            rule.filters.admits(
                context.service_category,
                context.resource_category,
                context.check_in_date,
            )
        })
    }

    pub fn diagnostics(&self) -> &[RuleDiagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResourceCategory, ServiceCategory};
    use crate::pricing::models::{AdjustmentKind, RuleType, Season};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn seasonal(id: u128, season: Option<Season>) -> PricingRuleRecord {
        PricingRuleRecord {
            season,
            ..PricingRuleRecord::new(
                Uuid::from_u128(id),
                format!("rule {id}"),
                RuleType::Seasonal,
                AdjustmentKind::Percentage,
                dec!(10),
            )
        }
    }

    fn context() -> QuoteContext {
        let date = NaiveDate::from_ymd_opt(2024, 7, 6).unwrap();
        QuoteContext {
            service_category: ServiceCategory::Boarding,
            resource_category: ResourceCategory::StandardSuite,
            check_in_date: date,
            check_out_date: date,
            booking_date: date,
            current_occupancy_percentage: Decimal::ZERO,
        }
    }

    #[test]
    fn test_from_records_keeps_order_and_reports_defects() {
        let mut inactive = seasonal(4, Some(Season::Fall));
        inactive.is_active = false;

        let set = RuleSet::from_records(vec![
            seasonal(3, Some(Season::Summer)),
            seasonal(1, None),
            seasonal(2, Some(Season::Winter)),
            inactive,
        ]);

        let ids: Vec<u128> = set.iter().map(|r| r.id.as_u128()).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(set.len(), 2);

        assert_eq!(set.diagnostics().len(), 1);
        assert_eq!(set.diagnostics()[0].rule_id, Uuid::from_u128(1));
        assert!(set.diagnostics()[0].message.contains("season"));
    }

    #[test]
    fn test_applicable_to_filters_by_category() {
        let mut grooming_only = seasonal(2, Some(Season::Summer));
        grooming_only.service_categories = vec![ServiceCategory::Grooming];

        let set = RuleSet::from_records(vec![seasonal(1, Some(Season::Summer)), grooming_only]);
        let ctx = context();
        let applicable: Vec<(usize, u128)> = set
            .applicable_to(&ctx)
            .map(|(seq, r)| (seq, r.id.as_u128()))
            .collect();
        assert_eq!(applicable, vec![(0, 1)]);
    }

    #[test]
    fn test_empty_set() {
        let set = RuleSet::from_records(Vec::new());
        assert!(set.is_empty());
        assert!(set.diagnostics().is_empty());
    }
}
