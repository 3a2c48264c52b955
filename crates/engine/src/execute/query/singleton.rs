// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tandem_plan::PlanExpr;

use crate::evaluate::{Datum, EvalContext, eval};

use super::QueryNode;

/// Yields the wrapped expression exactly once.
pub(crate) struct SingletonNode {
	value: PlanExpr,
	done: bool,
}

impl SingletonNode {
	pub(crate) fn new(value: PlanExpr) -> SingletonNode {
		SingletonNode { value, done: false }
	}
}

impl QueryNode for SingletonNode {
	fn next(&mut self, ctx: &mut EvalContext) -> tandem_core::Result<Option<Datum>> {
		if self.done {
			return Ok(None);
		}
		self.done = true;
		Ok(Some(eval(&self.value, ctx)?))
	}
}
