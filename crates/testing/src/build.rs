// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Shorthand constructors for command trees, used by the workspace
//! suites.

use tandem_plan::{BinaryOp, Expression, SetClause};
use tandem_type::IntoValue;

pub fn scan(table: &str) -> Expression {
	Expression::Scan(table.to_string())
}

pub fn var(name: &str) -> Expression {
	Expression::Variable(name.to_string())
}

pub fn param(name: &str) -> Expression {
	Expression::Parameter(name.to_string())
}

pub fn prop(variable: &str, name: &str) -> Expression {
	Expression::Property { instance: Box::new(var(variable)), name: name.to_string() }
}

pub fn constant(value: impl IntoValue) -> Expression {
	Expression::Constant(value.into_value())
}

pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
	Expression::Binary { op, left: Box::new(left), right: Box::new(right) }
}

pub fn filter(source: Expression, variable: &str, predicate: Expression) -> Expression {
	Expression::Filter {
		source: Box::new(source),
		variable: variable.to_string(),
		predicate: Box::new(predicate),
	}
}

pub fn project(source: Expression, variable: &str, body: Expression) -> Expression {
	Expression::Project {
		source: Box::new(source),
		variable: variable.to_string(),
		body: Box::new(body),
	}
}

pub fn call(function: &str, args: Vec<Expression>) -> Expression {
	Expression::Call { function: function.to_string(), args }
}

pub fn set(variable: &str, field: &str, value: Expression) -> SetClause {
	SetClause::new(prop(variable, field), value)
}
