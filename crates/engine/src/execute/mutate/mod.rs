// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Shared machinery of the insert, update and delete paths: candidate
//! row selection, set-clause binding and returning-row extraction. In
//! accelerator mode the backing database executes the statement first
//! and its outcome is reconciled against the in-memory store.

use std::sync::Arc;

use tandem_core::interface::{BackingConnection, TableProvider, ValueConverter};
use tandem_core::{Entity, Error, ReturningRow, TableSchema};
use tandem_plan::{PlanExpr, SetClause, TableHandle, Translator, set_clause_fields};
use tandem_type::{Type, Value};

use crate::evaluate::{Datum, EvalContext, eval};

pub(crate) mod delete;
pub(crate) mod insert;
pub(crate) mod update;

/// Collaborators of one modification execution.
pub(crate) struct MutationContext<'a> {
	pub provider: &'a dyn TableProvider,
	pub converter: &'a dyn ValueConverter,
	pub backing: Option<&'a dyn BackingConnection>,
}

/// Splits a compiled modification body into its target table and
/// optional candidate predicate.
pub(crate) fn mutation_target(
	body: &PlanExpr,
) -> tandem_core::Result<(&TableHandle, Option<&PlanExpr>)> {
	match body {
		PlanExpr::Source(handle) => Ok((handle, None)),
		PlanExpr::Filter { input, predicate } => match input.as_ref() {
			PlanExpr::Source(handle) => Ok((handle, Some(predicate))),
			_ => Err(Error::unsupported_command_shape(
				"modification target must be a table scan",
			)),
		},
		_ => Err(Error::unsupported_command_shape(
			"modification target must be a table scan",
		)),
	}
}

/// Snapshots the target table and keeps the rows the predicate
/// selects. Without a predicate every row is a candidate.
pub(crate) fn matched_rows(
	handle: &TableHandle,
	predicate: Option<&PlanExpr>,
	ctx: &mut EvalContext,
) -> tandem_core::Result<Vec<Entity>> {
	let names = field_names(handle.schema());
	let mut matched = Vec::new();
	for entity in handle.table().scan() {
		let keep = match predicate {
			Some(predicate) => {
				ctx.push_row(Datum::Row {
					names: Arc::clone(&names),
					values: entity.values().to_vec(),
				});
				let verdict = eval(predicate, ctx);
				ctx.pop_row();
				matches!(verdict?, Datum::Scalar(Value::Bool(true)))
			}
			None => true,
		};
		if keep {
			matched.push(entity);
		}
	}
	Ok(matched)
}

pub(crate) fn field_names(schema: &TableSchema) -> Arc<Vec<String>> {
	Arc::new(schema.field_names().iter().map(|n| n.to_string()).collect())
}

/// One set clause lowered against the target schema: the field slot it
/// assigns, the declared type the value is corrected to and the
/// executable value expression.
pub(crate) struct SetBinding {
	pub index: usize,
	pub ty: Type,
	pub expr: PlanExpr,
}

/// Lowers the set clauses of a statement. When `row` names the target
/// binding, value expressions may reference the current row; insert
/// values evaluate without a row in scope.
pub(crate) fn bind_set_clauses(
	schema: &TableSchema,
	set_clauses: &[SetClause],
	translator: &mut Translator<'_>,
	row: Option<(&str, &PlanExpr)>,
) -> tandem_core::Result<Vec<SetBinding>> {
	let fields = set_clause_fields(set_clauses)?;
	let mut bindings = Vec::with_capacity(fields.len());
	for (name, value_expr) in fields {
		let index = schema.field_index(&name).ok_or_else(|| {
			Error::unsupported_command_shape(format!(
				"set clause targets unknown field {name}"
			))
		})?;
		let ty = match schema.field(index) {
			Some(field) => field.ty,
			None => Type::Undefined,
		};
		let expr = match row {
			Some((variable, source)) => {
				translator.translate_in_row_scope(variable, source, value_expr)?
			}
			None => translator.translate(value_expr)?,
		};
		bindings.push(SetBinding { index, ty, expr });
	}
	Ok(bindings)
}

/// Evaluates every binding and writes the corrected values into the
/// entity by field index.
pub(crate) fn apply_bindings(
	bindings: &[SetBinding],
	entity: &mut Entity,
	ctx: &mut EvalContext,
	converter: &dyn ValueConverter,
) -> tandem_core::Result<()> {
	for binding in bindings {
		let value = eval(&binding.expr, ctx)?.into_scalar()?;
		entity.set(binding.index, converter.to_store_value(value, &binding.ty)?);
	}
	Ok(())
}

pub(crate) fn returning_names(returning: &Option<Vec<String>>) -> &[String] {
	returning.as_deref().unwrap_or(&[])
}

/// Reads the declared returning fields out of a post-mutation entity
/// and maps them to the caller domain.
pub(crate) fn entity_returning_row(
	schema: &TableSchema,
	entity: &Entity,
	names: &[String],
	converter: &dyn ValueConverter,
) -> tandem_core::Result<ReturningRow> {
	let mut row = ReturningRow::new();
	for name in names {
		let index = schema.field_index(name).ok_or_else(|| {
			Error::unsupported_command_shape(format!(
				"returning field {name} is not part of the table"
			))
		})?;
		let value = entity.get(index).cloned().unwrap_or(Value::Undefined);
		row.insert(name.clone(), converter.to_caller_value(value)?);
	}
	Ok(row)
}
