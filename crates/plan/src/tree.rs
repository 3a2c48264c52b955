// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tandem_core::Error;
use tandem_type::Type;

use crate::Expression;

/// Declared parameter of a statement: the name the caller binds and
/// the store type the bound value is corrected to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
	pub name: String,
	pub ty: Type,
}

impl ParameterDecl {
	pub fn new(name: impl Into<String>, ty: Type) -> ParameterDecl {
		ParameterDecl { name: name.into(), ty }
	}
}

/// One `field = value` assignment of an insert or update statement.
/// The target must be a property reference over the bound row
/// variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetClause {
	pub target: Expression,
	pub value: Expression,
}

impl SetClause {
	pub fn new(target: Expression, value: Expression) -> SetClause {
		SetClause { target, value }
	}
}

/// Modification target: the scanned table together with the row
/// variable name the predicate and set clauses are written against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetBinding {
	pub source: Expression,
	pub variable: String,
}

impl TargetBinding {
	pub fn new(source: Expression, variable: impl Into<String>) -> TargetBinding {
		TargetBinding { source, variable: variable.into() }
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandKind {
	Query {
		root: Expression,
	},
	Insert {
		target: Expression,
		set_clauses: Vec<SetClause>,
		returning: Option<Vec<String>>,
	},
	Update {
		target: TargetBinding,
		predicate: Option<Expression>,
		set_clauses: Vec<SetClause>,
		returning: Option<Vec<String>>,
	},
	Delete {
		target: TargetBinding,
		predicate: Option<Expression>,
	},
}

/// Provider-independent description of a single statement, the unit
/// handed to the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTree {
	pub parameters: Vec<ParameterDecl>,
	pub kind: CommandKind,
}

impl CommandTree {
	pub fn new(parameters: Vec<ParameterDecl>, kind: CommandKind) -> CommandTree {
		CommandTree { parameters, kind }
	}
}

/// Collects set clauses into an ordered field → value-expression map.
/// Rejects targets that are not plain row-property references and
/// duplicate field assignments.
pub fn set_clause_fields(
	clauses: &[SetClause],
) -> tandem_core::Result<IndexMap<String, &Expression>> {
	let mut fields = IndexMap::new();
	for clause in clauses {
		let name = match &clause.target {
			Expression::Property { instance, name }
				if matches!(instance.as_ref(), Expression::Variable(_)) =>
			{
				name.clone()
			}
			other => {
				return Err(Error::unsupported_command_shape(format!(
					"set clause target must be a row property reference, got {}",
					other.kind()
				)));
			}
		};
		if fields.insert(name.clone(), &clause.value).is_some() {
			return Err(Error::unsupported_command_shape(format!(
				"field {name} is assigned more than once"
			)));
		}
	}
	Ok(fields)
}
