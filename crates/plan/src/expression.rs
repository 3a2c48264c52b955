// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use tandem_type::Value;

/// Relational expression as supplied by the caller inside a command
/// tree. This is the input surface of the compiler; it is never
/// executed directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
	/// Full scan of a named table.
	Scan(String),
	/// Row-wise selection. `variable` is bound to each source row
	/// while `predicate` is evaluated.
	Filter {
		source: Box<Expression>,
		variable: String,
		predicate: Box<Expression>,
	},
	/// Row-wise projection. `variable` is bound to each source row
	/// while `body` produces the output value.
	Project {
		source: Box<Expression>,
		variable: String,
		body: Box<Expression>,
	},
	/// Reference to a row variable bound by an enclosing filter,
	/// projection or modification target.
	Variable(String),
	/// Reference to a declared statement parameter.
	Parameter(String),
	/// Field access on a row-valued instance.
	Property {
		instance: Box<Expression>,
		name: String,
	},
	Constant(Value),
	/// Anonymous record construction with named fields in declaration
	/// order.
	NewInstance(Vec<(String, Expression)>),
	Binary {
		op: BinaryOp,
		left: Box<Expression>,
		right: Box<Expression>,
	},
	Unary {
		op: UnaryOp,
		expr: Box<Expression>,
	},
	/// Function application, e.g. `sum`, `first_or_default`,
	/// `singleton`. Unknown functions are rejected at compile time.
	Call {
		function: String,
		args: Vec<Expression>,
	},
}

impl Expression {
	pub fn kind(&self) -> &'static str {
		match self {
			Expression::Scan(_) => "scan",
			Expression::Filter { .. } => "filter",
			Expression::Project { .. } => "project",
			Expression::Variable(_) => "variable",
			Expression::Parameter(_) => "parameter",
			Expression::Property { .. } => "property",
			Expression::Constant(_) => "constant",
			Expression::NewInstance(_) => "new_instance",
			Expression::Binary { .. } => "binary",
			Expression::Unary { .. } => "unary",
			Expression::Call { .. } => "call",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
	Add,
	Sub,
	Mul,
	Div,
	Rem,
	Eq,
	NotEq,
	LessThan,
	LessThanEq,
	GreaterThan,
	GreaterThanEq,
	And,
	Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
	Not,
	Neg,
}

impl Display for BinaryOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			BinaryOp::Add => f.write_str("+"),
			BinaryOp::Sub => f.write_str("-"),
			BinaryOp::Mul => f.write_str("*"),
			BinaryOp::Div => f.write_str("/"),
			BinaryOp::Rem => f.write_str("%"),
			BinaryOp::Eq => f.write_str("=="),
			BinaryOp::NotEq => f.write_str("!="),
			BinaryOp::LessThan => f.write_str("<"),
			BinaryOp::LessThanEq => f.write_str("<="),
			BinaryOp::GreaterThan => f.write_str(">"),
			BinaryOp::GreaterThanEq => f.write_str(">="),
			BinaryOp::And => f.write_str("and"),
			BinaryOp::Or => f.write_str("or"),
		}
	}
}

impl Display for UnaryOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			UnaryOp::Not => f.write_str("not "),
			UnaryOp::Neg => f.write_str("-"),
		}
	}
}

impl Display for Expression {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Expression::Scan(table) => write!(f, "scan({})", table),
			Expression::Filter {
				source,
				variable,
				predicate,
			} => {
				write!(f, "filter({}, |{}| {})", source, variable, predicate)
			}
			Expression::Project {
				source,
				variable,
				body,
			} => {
				write!(f, "project({}, |{}| {})", source, variable, body)
			}
			Expression::Variable(name) => f.write_str(name),
			Expression::Parameter(name) => write!(f, ":{}", name),
			Expression::Property { instance, name } => {
				write!(f, "{}.{}", instance, name)
			}
			Expression::Constant(value) => write!(f, "{}", value),
			Expression::NewInstance(fields) => {
				f.write_str("{")?;
				for (i, (name, expr)) in fields.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}: {}", name, expr)?;
				}
				f.write_str("}")
			}
			Expression::Binary { op, left, right } => {
				write!(f, "({} {} {})", left, op, right)
			}
			Expression::Unary { op, expr } => write!(f, "({}{})", op, expr),
			Expression::Call { function, args } => {
				write!(f, "{}(", function)?;
				for (i, arg) in args.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", arg)?;
				}
				f.write_str(")")
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_filter() {
		let expr = Expression::Filter {
			source: Box::new(Expression::Scan("person".to_string())),
			variable: "p".to_string(),
			predicate: Box::new(Expression::Binary {
				op: BinaryOp::GreaterThan,
				left: Box::new(Expression::Property {
					instance: Box::new(Expression::Variable("p".to_string())),
					name: "age".to_string(),
				}),
				right: Box::new(Expression::Parameter("min_age".to_string())),
			}),
		};
		assert_eq!(expr.to_string(), "filter(scan(person), |p| (p.age > :min_age))");
	}

	#[test]
	fn test_display_new_instance() {
		let expr = Expression::NewInstance(vec![
			("name".to_string(), Expression::Constant(Value::Utf8("ann".to_string()))),
			("age".to_string(), Expression::Constant(Value::Int4(29))),
		]);
		assert_eq!(expr.to_string(), "{name: \"ann\", age: 29}");
	}

	#[test]
	fn test_kind() {
		assert_eq!(Expression::Scan("t".to_string()).kind(), "scan");
		assert_eq!(Expression::Variable("x".to_string()).kind(), "variable");
		assert_eq!(
			Expression::Call { function: "sum".to_string(), args: Vec::new() }.kind(),
			"call"
		);
	}
}
