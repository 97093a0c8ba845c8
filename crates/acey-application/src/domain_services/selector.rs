//! Provider selection
//!
//! Filtering happens in three passes (availability and exclusions,
//! capabilities, input budget) and ranking in one:
//!
//! 1. any eligible local provider wins, lowest priority first
//! 2. otherwise, with cost optimization on, the cheapest provider wins
//!    (an undeclared cost counts as free)
//! 3. otherwise the lowest priority number wins
//!
//! Every remaining tie is broken by registration order.

use super::registry::ProviderRegistry;
use acey_domain::value_objects::{Provider, SkillRequest};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Chooses the provider that serves a request
pub struct ProviderSelector {
    registry: Arc<ProviderRegistry>,
    cost_optimization: AtomicBool,
}

impl ProviderSelector {
    /// Create a selector over `registry`
    pub fn new(registry: Arc<ProviderRegistry>, cost_optimization: bool) -> Self {
        Self {
            registry,
            cost_optimization: AtomicBool::new(cost_optimization),
        }
    }

    /// Toggle cost-based ranking for remote providers
    pub fn set_cost_optimization(&self, enabled: bool) {
        self.cost_optimization.store(enabled, Ordering::Relaxed);
    }

    /// Whether cost-based ranking is on
    pub fn cost_optimization(&self) -> bool {
        self.cost_optimization.load(Ordering::Relaxed)
    }

    /// The registry this selector reads from
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Pick a provider for `request`, or `None` when nothing is eligible
    pub fn select(&self, request: &SkillRequest) -> Option<Provider> {
        self.select_excluding(request, &BTreeSet::new())
    }

    /// Pick a provider, skipping the names in `excluded`
    pub fn select_excluding(
        &self,
        request: &SkillRequest,
        excluded: &BTreeSet<String>,
    ) -> Option<Provider> {
        let candidates = self.eligible(request, excluded);
        let chosen = rank(candidates, self.cost_optimization());
        match &chosen {
            Some(provider) => debug!(
                request_id = %request.id,
                skill = %request.skill_name,
                provider = %provider.name,
                "Provider selected"
            ),
            None => debug!(
                request_id = %request.id,
                skill = %request.skill_name,
                excluded = excluded.len(),
                "No eligible provider"
            ),
        }
        chosen
    }

    /// Providers that pass every filter, in registration order
    pub fn eligible(&self, request: &SkillRequest, excluded: &BTreeSet<String>) -> Vec<Provider> {
        let units = request.estimated_input_units();
        self.registry
            .snapshot()
            .into_iter()
            .filter(|p| p.available && !excluded.contains(&p.name))
            .filter(|p| p.supports(&request.required_capabilities))
            .filter(|p| p.accepts_input(units))
            .collect()
    }
}

/// Apply the ranking rules to an already filtered list
fn rank(candidates: Vec<Provider>, cost_optimization: bool) -> Option<Provider> {
    let indexed = candidates.into_iter().enumerate();

    let locals: Vec<(usize, Provider)> = indexed.clone().filter(|(_, p)| p.is_local()).collect();
    if !locals.is_empty() {
        return locals
            .into_iter()
            .min_by_key(|(index, p)| (p.priority, *index))
            .map(|(_, p)| p);
    }

    if cost_optimization {
        return indexed
            .min_by(|(ia, a), (ib, b)| {
                let cost_a = a.cost_per_call.unwrap_or(0.0);
                let cost_b = b.cost_per_call.unwrap_or(0.0);
                cost_a
                    .total_cmp(&cost_b)
                    .then(a.priority.cmp(&b.priority))
                    .then(ia.cmp(ib))
            })
            .map(|(_, p)| p);
    }

    indexed
        .min_by_key(|(index, p)| (p.priority, *index))
        .map(|(_, p)| p)
}
