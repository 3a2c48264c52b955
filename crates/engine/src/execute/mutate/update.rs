// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Arc;

use tandem_core::{Error, ReturningRow};
use tandem_plan::{CommandKind, CommandTree, CompiledPlan, PlanExpr, Translator};
use tandem_type::Params;
use tracing::debug;

use crate::evaluate::{Datum, EvalContext};
use crate::execute::bind_parameters;

use super::{
	MutationContext, apply_bindings, bind_set_clauses, entity_returning_row, field_names,
	matched_rows, mutation_target, returning_names,
};

/// Updates every candidate row. Set-clause values may read the row
/// being updated; fields without a set clause keep their current
/// value. In accelerator mode the backing row count, or the returned
/// rows when returning fields are declared, must match the in-memory
/// outcome.
pub(crate) fn execute(
	ctx: &MutationContext<'_>,
	plan: &CompiledPlan,
	tree: &CommandTree,
	text: &str,
	params: &Params,
) -> tandem_core::Result<(usize, Vec<ReturningRow>)> {
	let CommandKind::Update { target, set_clauses, returning, .. } = &tree.kind else {
		return Err(Error::unsupported_command_shape("statement is not an update"));
	};

	let bound = bind_parameters(&plan.parameters, params, ctx.converter)?;
	let (handle, predicate) = mutation_target(&plan.body)?;
	let schema = handle.schema();

	let source = PlanExpr::Source(handle.clone());
	let mut translator = Translator::new(&tree.parameters, ctx.provider);
	let bindings = bind_set_clauses(
		schema,
		set_clauses,
		&mut translator,
		Some((target.variable.as_str(), &source)),
	)?;

	let mut eval_ctx = EvalContext::new(bound);
	let matched = matched_rows(handle, predicate, &mut eval_ctx)?;

	let names = returning_names(returning);
	let mut backing_count = None;
	let mut backing_rows = Vec::new();
	if let Some(backing) = ctx.backing {
		if names.is_empty() {
			backing_count = Some(backing.execute_non_query(text)?);
		} else {
			backing_rows = backing.execute_reader(text)?;
			backing_count = Some(backing_rows.len());
		}
	}

	let row_names = field_names(schema);
	let mut affected = 0;
	let mut updated_rows = Vec::new();
	for existing in matched {
		let mut updated = existing.clone();
		eval_ctx.push_row(Datum::Row {
			names: Arc::clone(&row_names),
			values: existing.values().to_vec(),
		});
		let applied = apply_bindings(&bindings, &mut updated, &mut eval_ctx, ctx.converter);
		eval_ctx.pop_row();
		applied?;
		if handle.table().replace(&existing, updated.clone())? {
			affected += 1;
			updated_rows.push(updated);
		}
	}

	if let Some(backing) = backing_count {
		if backing != affected {
			return Err(Error::Consistency { backing, store: affected });
		}
	}
	debug!(table = handle.name(), affected, "updated rows");

	let rows = if names.is_empty() {
		Vec::new()
	} else if ctx.backing.is_some() {
		backing_rows
	} else {
		updated_rows
			.iter()
			.map(|entity| entity_returning_row(schema, entity, names, ctx.converter))
			.collect::<tandem_core::Result<Vec<_>>>()?
	};
	Ok((affected, rows))
}
