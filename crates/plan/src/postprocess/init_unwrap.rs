// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::PlanExpr;

use super::rewrite;

/// Collapses a field read on a freshly constructed record to the field
/// expression itself. Record fields are assigned unconditionally and
/// the executable form is side-effect free, so dropping the record
/// keeps the semantics.
pub fn unwrap_initializer(expr: PlanExpr) -> PlanExpr {
	rewrite(expr, &|expr| match expr {
		PlanExpr::Field { input, index, name } => match *input {
			PlanExpr::Record(mut fields) if index < fields.len() => {
				fields.swap_remove(index).1
			}
			input => PlanExpr::Field { input: Box::new(input), index, name },
		},
		other => other,
	})
}
