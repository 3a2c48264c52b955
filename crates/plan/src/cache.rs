// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::CompiledPlan;

/// Concurrent cache of compiled plans keyed by the exact statement
/// text. Textually distinct statements never share an entry. Entries
/// live for the lifetime of the container; there is no eviction and no
/// invalidation on schema change.
pub struct PlanCache {
	plans: DashMap<String, Arc<CompiledPlan>>,
}

impl PlanCache {
	pub fn new() -> PlanCache {
		PlanCache { plans: DashMap::new() }
	}

	pub fn lookup(&self, text: &str) -> Option<Arc<CompiledPlan>> {
		let plan = self.plans.get(text).map(|entry| Arc::clone(entry.value()));
		if plan.is_some() {
			debug!(statement = text, "plan cache hit");
		}
		plan
	}

	pub fn store(&self, text: impl Into<String>, plan: Arc<CompiledPlan>) {
		self.plans.insert(text.into(), plan);
	}

	pub fn len(&self) -> usize {
		self.plans.len()
	}

	pub fn is_empty(&self) -> bool {
		self.plans.is_empty()
	}
}

impl Default for PlanCache {
	fn default() -> PlanCache {
		PlanCache::new()
	}
}
