// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tandem_plan::PlanExpr;
use tandem_type::Value;

use crate::evaluate::{Datum, EvalContext, eval};

use super::QueryNode;

/// Keeps the input rows whose predicate evaluates to true. An
/// undefined predicate result drops the row, matching three-valued
/// selection semantics.
pub(crate) struct FilterNode {
	input: Box<dyn QueryNode>,
	predicate: PlanExpr,
}

impl FilterNode {
	pub(crate) fn new(input: Box<dyn QueryNode>, predicate: PlanExpr) -> FilterNode {
		FilterNode { input, predicate }
	}
}

impl QueryNode for FilterNode {
	fn next(&mut self, ctx: &mut EvalContext) -> tandem_core::Result<Option<Datum>> {
		while let Some(datum) = self.input.next(ctx)? {
			ctx.push_row(datum.clone());
			let verdict = eval(&self.predicate, ctx);
			ctx.pop_row();
			if let Datum::Scalar(Value::Bool(true)) = verdict? {
				return Ok(Some(datum));
			}
		}
		Ok(None)
	}
}
