// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tandem_core::{Error, ReturningRow};
use tandem_plan::{CommandKind, CommandTree, CompiledPlan};
use tandem_type::Params;
use tracing::debug;

use crate::evaluate::EvalContext;
use crate::execute::bind_parameters;

use super::{MutationContext, matched_rows, mutation_target};

/// Removes every candidate row. In accelerator mode the backing row
/// count must match the number of rows removed in memory.
pub(crate) fn execute(
	ctx: &MutationContext<'_>,
	plan: &CompiledPlan,
	tree: &CommandTree,
	text: &str,
	params: &Params,
) -> tandem_core::Result<(usize, Vec<ReturningRow>)> {
	if !matches!(tree.kind, CommandKind::Delete { .. }) {
		return Err(Error::unsupported_command_shape("statement is not a delete"));
	}

	let bound = bind_parameters(&plan.parameters, params, ctx.converter)?;
	let (handle, predicate) = mutation_target(&plan.body)?;

	let mut eval_ctx = EvalContext::new(bound);
	let matched = matched_rows(handle, predicate, &mut eval_ctx)?;

	let backing_count = match ctx.backing {
		Some(backing) => Some(backing.execute_non_query(text)?),
		None => None,
	};

	let mut affected = 0;
	for entity in &matched {
		if handle.table().delete(entity)? {
			affected += 1;
		}
	}

	if let Some(backing) = backing_count {
		if backing != affected {
			return Err(Error::Consistency { backing, store: affected });
		}
	}
	debug!(table = handle.name(), affected, "deleted rows");

	Ok((affected, Vec::new()))
}
