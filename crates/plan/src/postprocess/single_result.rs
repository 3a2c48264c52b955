// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::PlanExpr;

use super::rewrite;

/// Removes the sequence detour around scalar subresults:
/// `first_or_default(singleton(x))` is `x`.
pub fn unwrap_single_result(expr: PlanExpr) -> PlanExpr {
	rewrite(expr, &|expr| match expr {
		PlanExpr::FirstOrDefault(input) => match *input {
			PlanExpr::Singleton(value) => *value,
			input => PlanExpr::FirstOrDefault(Box::new(input)),
		},
		other => other,
	})
}
