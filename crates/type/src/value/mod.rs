// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

pub use ty::Type;

mod ty;

/// A single store-domain value. `Undefined` plays the role of SQL null
/// throughout the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
	Undefined,
	Bool(bool),
	Int1(i8),
	Int2(i16),
	Int4(i32),
	Int8(i64),
	Float8(f64),
	Utf8(String),
}

impl Value {
	pub fn ty(&self) -> Type {
		match self {
			Value::Undefined => Type::Undefined,
			Value::Bool(_) => Type::Bool,
			Value::Int1(_) => Type::Int1,
			Value::Int2(_) => Type::Int2,
			Value::Int4(_) => Type::Int4,
			Value::Int8(_) => Type::Int8,
			Value::Float8(_) => Type::Float8,
			Value::Utf8(_) => Type::Utf8,
		}
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	/// Widens any integer variant to i64. Returns `None` for non-integer
	/// values.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int1(v) => Some(*v as i64),
			Value::Int2(v) => Some(*v as i64),
			Value::Int4(v) => Some(*v as i64),
			Value::Int8(v) => Some(*v),
			_ => None,
		}
	}

	/// Widens any numeric variant to f64. Returns `None` for non-numeric
	/// values.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Float8(v) => Some(*v),
			other => other.as_i64().map(|v| v as f64),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Undefined => f.write_str("undefined"),
			Value::Bool(v) => write!(f, "{}", v),
			Value::Int1(v) => write!(f, "{}", v),
			Value::Int2(v) => write!(f, "{}", v),
			Value::Int4(v) => write!(f, "{}", v),
			Value::Int8(v) => write!(f, "{}", v),
			Value::Float8(v) => write!(f, "{}", v),
			Value::Utf8(v) => write!(f, "\"{}\"", v),
		}
	}
}

pub trait IntoValue {
	fn into_value(self) -> Value;
}

impl IntoValue for Value {
	fn into_value(self) -> Value {
		self
	}
}

impl IntoValue for bool {
	fn into_value(self) -> Value {
		Value::Bool(self)
	}
}

impl IntoValue for i8 {
	fn into_value(self) -> Value {
		Value::Int1(self)
	}
}

impl IntoValue for i16 {
	fn into_value(self) -> Value {
		Value::Int2(self)
	}
}

impl IntoValue for i32 {
	fn into_value(self) -> Value {
		Value::Int4(self)
	}
}

impl IntoValue for i64 {
	fn into_value(self) -> Value {
		Value::Int8(self)
	}
}

impl IntoValue for f64 {
	fn into_value(self) -> Value {
		Value::Float8(self)
	}
}

impl IntoValue for &str {
	fn into_value(self) -> Value {
		Value::Utf8(self.to_string())
	}
}

impl IntoValue for String {
	fn into_value(self) -> Value {
		Value::Utf8(self)
	}
}
