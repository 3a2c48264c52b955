// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tandem_plan::PlanExpr;

use crate::evaluate::{Datum, EvalContext, eval};

use super::QueryNode;

/// Projects each input row through the body expression.
pub(crate) struct MapNode {
	input: Box<dyn QueryNode>,
	body: PlanExpr,
}

impl MapNode {
	pub(crate) fn new(input: Box<dyn QueryNode>, body: PlanExpr) -> MapNode {
		MapNode { input, body }
	}
}

impl QueryNode for MapNode {
	fn next(&mut self, ctx: &mut EvalContext) -> tandem_core::Result<Option<Datum>> {
		match self.input.next(ctx)? {
			Some(datum) => {
				ctx.push_row(datum);
				let projected = eval(&self.body, ctx);
				ctx.pop_row();
				Ok(Some(projected?))
			}
			None => Ok(None),
		}
	}
}
