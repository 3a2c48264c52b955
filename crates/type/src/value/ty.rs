// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Declared type of a table field, a parameter slot or an expression.
/// `Undefined` stands for "no declared type"; conversions towards it are
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
	Undefined,
	Bool,
	Int1,
	Int2,
	Int4,
	Int8,
	Float8,
	Utf8,
}

impl Type {
	pub fn is_integer(&self) -> bool {
		matches!(self, Type::Int1 | Type::Int2 | Type::Int4 | Type::Int8)
	}

	pub fn is_numeric(&self) -> bool {
		self.is_integer() || matches!(self, Type::Float8)
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Type::Undefined => f.write_str("undefined"),
			Type::Bool => f.write_str("bool"),
			Type::Int1 => f.write_str("int1"),
			Type::Int2 => f.write_str("int2"),
			Type::Int4 => f.write_str("int4"),
			Type::Int8 => f.write_str("int8"),
			Type::Float8 => f.write_str("float8"),
			Type::Utf8 => f.write_str("utf8"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_is_integer() {
		assert!(Type::Int1.is_integer());
		assert!(Type::Int8.is_integer());
		assert!(!Type::Float8.is_integer());
		assert!(!Type::Utf8.is_integer());
	}

	#[test]
	fn test_is_numeric() {
		assert!(Type::Int2.is_numeric());
		assert!(Type::Float8.is_numeric());
		assert!(!Type::Bool.is_numeric());
	}
}
