// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tandem_core::interface::ValueConverter;
use tandem_plan::{CompiledPlan, PlanExpr};
use tandem_type::Params;

use crate::evaluate::{Datum, EvalContext};
use crate::execute::bind_parameters;

pub(crate) use filter::FilterNode;
pub(crate) use map::MapNode;
pub(crate) use scan::ScanNode;
pub(crate) use singleton::SingletonNode;

mod filter;
mod map;
mod scan;
mod singleton;

/// One operator of an executing query. Operators pull from their input
/// on demand; nothing runs until the stream is consumed.
pub(crate) trait QueryNode {
	fn next(&mut self, ctx: &mut EvalContext) -> tandem_core::Result<Option<Datum>>;
}

/// Builds the operator for a sequence-valued expression. A
/// scalar-valued expression becomes a one-element sequence, which
/// keeps scalar statements executable through the same surface.
pub(crate) fn compile_node(expr: &PlanExpr) -> tandem_core::Result<Box<dyn QueryNode>> {
	match expr {
		PlanExpr::Source(handle) => Ok(Box::new(ScanNode::new(handle.clone()))),
		PlanExpr::Filter { input, predicate } => Ok(Box::new(FilterNode::new(
			compile_node(input)?,
			(**predicate).clone(),
		))),
		PlanExpr::Map { input, body } => {
			Ok(Box::new(MapNode::new(compile_node(input)?, (**body).clone())))
		}
		PlanExpr::Singleton(value) => Ok(Box::new(SingletonNode::new((**value).clone()))),
		scalar => Ok(Box::new(SingletonNode::new(scalar.clone()))),
	}
}

/// Lazily evaluated result sequence of one statement execution. The
/// sequence is finite and single-pass; rows reflect the store state at
/// enumeration, not at creation.
pub struct RowStream {
	node: Box<dyn QueryNode>,
	ctx: EvalContext,
}

impl RowStream {
	pub(crate) fn new(node: Box<dyn QueryNode>, ctx: EvalContext) -> RowStream {
		RowStream { node, ctx }
	}

	pub fn next_row(&mut self) -> tandem_core::Result<Option<Datum>> {
		self.node.next(&mut self.ctx)
	}
}

impl std::fmt::Debug for RowStream {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RowStream").finish_non_exhaustive()
	}
}

impl Iterator for RowStream {
	type Item = tandem_core::Result<Datum>;

	fn next(&mut self) -> Option<Self::Item> {
		self.next_row().transpose()
	}
}

/// Prepares a compiled plan for enumeration: binds and converts the
/// caller parameters, then wires the operator tree.
pub(crate) fn execute(
	plan: &CompiledPlan,
	params: &Params,
	converter: &dyn ValueConverter,
) -> tandem_core::Result<RowStream> {
	let bound = bind_parameters(&plan.parameters, params, converter)?;
	let node = compile_node(&plan.body)?;
	Ok(RowStream::new(node, EvalContext::new(bound)))
}
