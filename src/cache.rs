//! In-memory caching using moka
//!
//! Wraps a [`RuleRepository`] so repeated quotes for the same service,
//! resource category and check-in date reuse one fetch. Rules change rarely
//! compared to how often quotes are requested, so a short TTL is enough.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::DependencyError;
use crate::models::{ResourceCategory, ServiceCategory};
use crate::pricing::{PricingRuleRecord, QuoteContext, RuleRepository};

/// Everything the repository's answer depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleCacheKey {
    pub service_category: ServiceCategory,
    pub resource_category: ResourceCategory,
    pub check_in_date: NaiveDate,
}

impl From<&QuoteContext> for RuleCacheKey {
    fn from(context: &QuoteContext) -> Self {
        Self {
            service_category: context.service_category,
            resource_category: context.resource_category,
            check_in_date: context.check_in_date,
        }
    }
}

/// Read-through cache in front of a rule repository.
///
/// Failed fetches are not cached.
pub struct CachedRuleRepository<R> {
    inner: R,
    rules: Cache<RuleCacheKey, Arc<Vec<PricingRuleRecord>>>,
}

impl<R: RuleRepository> CachedRuleRepository<R> {
    pub fn new(inner: R, ttl: Duration, capacity: u64) -> Self {
        Self {
            inner,
            rules: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn from_config(inner: R, config: &EngineConfig) -> Self {
        Self::new(inner, config.rule_cache_ttl, config.rule_cache_capacity)
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Drop every cached rule list, e.g. after rules were edited.
    pub fn invalidate_all(&self) {
        self.rules.invalidate_all();
        info!("Rule cache invalidated");
    }
}

impl<R: RuleRepository> RuleRepository for CachedRuleRepository<R> {
    fn active_rules_for(
        &self,
        context: &QuoteContext,
    ) -> Result<Vec<PricingRuleRecord>, DependencyError> {
        let key = RuleCacheKey::from(context);
        if let Some(hit) = self.rules.get(&key) {
            debug!(?key, "rule cache hit");
            return Ok(hit.as_ref().clone());
        }

        debug!(?key, "rule cache miss");
        let records = self.inner.active_rules_for(context)?;
        self.rules.insert(key, Arc::new(records.clone()));
        Ok(records)
    }
}
