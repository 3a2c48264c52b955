// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tandem_core::{Error, interface::ValueConverter};
use tandem_plan::ParameterDecl;
use tandem_type::{Params, Value};

pub(crate) mod mutate;
pub(crate) mod query;

/// Binds caller parameters to the declared slots. Every declared
/// parameter must be supplied and every supplied parameter must be
/// declared; bound values are corrected to the declared store type.
pub(crate) fn bind_parameters(
	declarations: &[ParameterDecl],
	params: &Params,
	converter: &dyn ValueConverter,
) -> tandem_core::Result<Vec<Value>> {
	for name in params.names() {
		if !declarations.iter().any(|decl| decl.name == name) {
			return Err(Error::parameter_binding(format!(
				"parameter {name} is not declared by the statement"
			)));
		}
	}
	declarations
		.iter()
		.map(|decl| {
			let value = params.get(&decl.name).cloned().ok_or_else(|| {
				Error::parameter_binding(format!(
					"parameter {} has no bound value",
					decl.name
				))
			})?;
			converter.to_store_value(value, &decl.ty)
		})
		.collect()
}
