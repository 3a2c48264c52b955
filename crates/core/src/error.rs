// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tandem_type::{Type, Value};

/// Unified error taxonomy for plan compilation and execution.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
	#[error("unsupported expression: {kind}")]
	UnsupportedExpression { kind: String },

	#[error("command shape is not supported: {detail}")]
	UnsupportedCommandShape { detail: String },

	#[error("parameter binding failed: {detail}")]
	ParameterBinding { detail: String },

	#[error("value {value} cannot be converted to {target}")]
	UnconvertibleValue { value: Value, target: Type },

	#[error("table {name} does not exist")]
	UnknownTable { name: String },

	#[error("the backing database returned no row for a statement that declares returning fields")]
	MissingReturningRow,

	#[error(
		"row count diverged between backing database and in-memory store: backing {backing}, store {store}"
	)]
	Consistency { backing: usize, store: usize },

	#[error("backing database error: {0}")]
	Backing(String),

	#[error("invalid configuration: {detail}")]
	Configuration { detail: String },
}

impl Error {
	pub fn unsupported_expression(kind: impl Into<String>) -> Error {
		Error::UnsupportedExpression { kind: kind.into() }
	}

	pub fn unsupported_command_shape(detail: impl Into<String>) -> Error {
		Error::UnsupportedCommandShape { detail: detail.into() }
	}

	pub fn parameter_binding(detail: impl Into<String>) -> Error {
		Error::ParameterBinding { detail: detail.into() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_unsupported_expression() {
		let err = Error::unsupported_expression("call to unknown function now()");
		assert_eq!(err.to_string(), "unsupported expression: call to unknown function now()");
	}

	#[test]
	fn test_display_unconvertible_value() {
		let err = Error::UnconvertibleValue {
			value: Value::Utf8("abc".to_string()),
			target: Type::Int4,
		};
		assert_eq!(err.to_string(), "value \"abc\" cannot be converted to int4");
	}

	#[test]
	fn test_display_consistency() {
		let err = Error::Consistency { backing: 2, store: 1 };
		assert_eq!(
			err.to_string(),
			"row count diverged between backing database and in-memory store: backing 2, store 1"
		);
	}
}
