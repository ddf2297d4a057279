//! Rule repository collaborator.

use crate::error::DependencyError;

use super::models::PricingRuleRecord;
use super::requests::QuoteContext;

/// Source of administered pricing rules.
///
/// Records are returned in registration order; that order breaks priority ties.
pub trait RuleRepository {
    fn active_rules_for(
        &self,
        context: &QuoteContext,
    ) -> Result<Vec<PricingRuleRecord>, DependencyError>;
}

impl<T: RuleRepository + ?Sized> RuleRepository for &T {
    fn active_rules_for(
        &self,
        context: &QuoteContext,
    ) -> Result<Vec<PricingRuleRecord>, DependencyError> {
        (**self).active_rules_for(context)
    }
}

/// Rule records held in memory, in registration order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRuleRepository {
    records: Vec<PricingRuleRecord>,
}

impl InMemoryRuleRepository {
    pub fn new(records: Vec<PricingRuleRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: PricingRuleRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[PricingRuleRecord] {
        &self.records
    }
}

impl RuleRepository for InMemoryRuleRepository {
    /// Active records whose category lists admit the context.
    ///
    /// Type parameters are not inspected here; malformed records are passed
    /// on so the engine can report them.
    fn active_rules_for(
        &self,
        context: &QuoteContext,
    ) -> Result<Vec<PricingRuleRecord>, DependencyError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.is_active)
            .filter(|r| {
                r.service_categories.is_empty()
                    || r.service_categories.contains(&context.service_category)
            })
            .filter(|r| {
                r.resource_categories.is_empty()
                    || r.resource_categories.contains(&context.resource_category)
            })
            .cloned()
            .collect())
    }
}
