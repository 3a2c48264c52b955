// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::PlanExpr;

use super::rewrite;

/// Turns every sum into its null-aware form: an empty or all-undefined
/// input sums to `Undefined` instead of zero.
pub fn null_aware_sum(expr: PlanExpr) -> PlanExpr {
	rewrite(expr, &|expr| match expr {
		PlanExpr::Sum { input, null_aware: false } => {
			PlanExpr::Sum { input, null_aware: true }
		}
		other => other,
	})
}
