// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::collections::HashSet;

use tandem_core::{Entity, Error, ReturningRow};
use tandem_plan::{CommandKind, CommandTree, CompiledPlan, Translator};
use tandem_type::{Params, Value};
use tracing::debug;

use crate::evaluate::EvalContext;
use crate::execute::bind_parameters;

use super::{
	MutationContext, apply_bindings, bind_set_clauses, entity_returning_row, mutation_target,
	returning_names,
};

/// Inserts one row. Fields without a set clause stay undefined so the
/// store fills defaults and generated values. In accelerator mode the
/// backing database runs the statement first; its returned row is
/// authoritative and seeds generated fields of the in-memory row so
/// both stores converge.
pub(crate) fn execute(
	ctx: &MutationContext<'_>,
	plan: &CompiledPlan,
	tree: &CommandTree,
	text: &str,
	params: &Params,
) -> tandem_core::Result<(usize, Vec<ReturningRow>)> {
	let CommandKind::Insert { set_clauses, returning, .. } = &tree.kind else {
		return Err(Error::unsupported_command_shape("statement is not an insert"));
	};

	let bound = bind_parameters(&plan.parameters, params, ctx.converter)?;
	let (handle, _) = mutation_target(&plan.body)?;
	let schema = handle.schema();

	let mut translator = Translator::new(&tree.parameters, ctx.provider);
	let bindings = bind_set_clauses(schema, set_clauses, &mut translator, None)?;

	let mut eval_ctx = EvalContext::new(bound);
	let mut entity = Entity::new(vec![Value::Undefined; schema.len()]);
	apply_bindings(&bindings, &mut entity, &mut eval_ctx, ctx.converter)?;

	let names = returning_names(returning);
	let mut backing_rows = Vec::new();
	if let Some(backing) = ctx.backing {
		if names.is_empty() {
			let affected = backing.execute_non_query(text)?;
			if affected != 1 {
				return Err(Error::Consistency { backing: affected, store: 1 });
			}
		} else {
			backing_rows = backing.execute_reader(text)?;
			if backing_rows.is_empty() {
				return Err(Error::MissingReturningRow);
			}
			seed_generated_fields(&mut entity, schema, &bindings, names, &backing_rows[0], ctx)?;
		}
	}

	let stored = handle.table().insert(entity)?;
	debug!(table = handle.name(), "inserted one row");

	let rows = if names.is_empty() {
		Vec::new()
	} else if !backing_rows.is_empty() {
		backing_rows
	} else {
		vec![entity_returning_row(schema, &stored, names, ctx.converter)?]
	};
	Ok((1, rows))
}

/// Copies returning fields the statement did not assign from the
/// backing row into the new entity before the in-memory insert.
fn seed_generated_fields(
	entity: &mut Entity,
	schema: &tandem_core::TableSchema,
	bindings: &[super::SetBinding],
	names: &[String],
	backing_row: &ReturningRow,
	ctx: &MutationContext<'_>,
) -> tandem_core::Result<()> {
	let assigned: HashSet<usize> = bindings.iter().map(|b| b.index).collect();
	for name in names {
		let index = schema.field_index(name).ok_or_else(|| {
			Error::unsupported_command_shape(format!(
				"returning field {name} is not part of the table"
			))
		})?;
		if assigned.contains(&index) {
			continue;
		}
		if let (Some(field), Some(value)) = (schema.field(index), backing_row.get(name)) {
			entity.set(index, ctx.converter.to_store_value(value.clone(), &field.ty)?);
		}
	}
	Ok(())
}
