// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tandem_core::{Error, interface::ValueConverter};
use tandem_type::{Type, Value};

/// Default value converter. Integers convert to any integer type whose
/// range holds the value (arithmetic widens to `Int8`, so assignments
/// back into narrower fields must fit), every numeric converts to
/// `Float8`, `Undefined` passes through to any declared type and
/// everything else is rejected. Caller and store share the value
/// domain, so the caller direction is identity.
pub struct StandardConverter;

fn fit_integer(value: i64, target: &Type) -> Option<Value> {
	match target {
		Type::Int1 => i8::try_from(value).ok().map(Value::Int1),
		Type::Int2 => i16::try_from(value).ok().map(Value::Int2),
		Type::Int4 => i32::try_from(value).ok().map(Value::Int4),
		Type::Int8 => Some(Value::Int8(value)),
		_ => None,
	}
}

impl ValueConverter for StandardConverter {
	fn to_store_value(&self, value: Value, target: &Type) -> tandem_core::Result<Value> {
		if value.is_undefined() || *target == Type::Undefined || value.ty() == *target {
			return Ok(value);
		}
		if let Some(integer) = value.as_i64() {
			if target.is_integer() {
				return fit_integer(integer, target).ok_or(Error::UnconvertibleValue {
					value,
					target: *target,
				});
			}
		}
		if *target == Type::Float8 {
			if let Some(v) = value.as_f64() {
				return Ok(Value::Float8(v));
			}
		}
		Err(Error::UnconvertibleValue { value, target: *target })
	}

	fn to_caller_value(&self, value: Value) -> tandem_core::Result<Value> {
		Ok(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_identity_on_exact_match() {
		let converter = StandardConverter;
		assert_eq!(
			converter.to_store_value(Value::Int4(7), &Type::Int4).unwrap(),
			Value::Int4(7)
		);
	}

	#[test]
	fn test_widens_integers() {
		let converter = StandardConverter;
		assert_eq!(
			converter.to_store_value(Value::Int1(7), &Type::Int8).unwrap(),
			Value::Int8(7)
		);
		assert_eq!(
			converter.to_store_value(Value::Int4(7), &Type::Float8).unwrap(),
			Value::Float8(7.0)
		);
	}

	#[test]
	fn test_narrows_integers_that_fit() {
		let converter = StandardConverter;
		assert_eq!(
			converter.to_store_value(Value::Int8(30), &Type::Int4).unwrap(),
			Value::Int4(30)
		);
	}

	#[test]
	fn test_rejects_out_of_range_narrowing() {
		let converter = StandardConverter;
		assert_eq!(
			converter.to_store_value(Value::Int8(300), &Type::Int1).unwrap_err(),
			Error::UnconvertibleValue { value: Value::Int8(300), target: Type::Int1 }
		);
	}

	#[test]
	fn test_undefined_passes_through() {
		let converter = StandardConverter;
		assert_eq!(
			converter.to_store_value(Value::Undefined, &Type::Utf8).unwrap(),
			Value::Undefined
		);
	}

	#[test]
	fn test_rejects_cross_domain() {
		let converter = StandardConverter;
		assert!(
			converter
				.to_store_value(Value::Utf8("7".to_string()), &Type::Int4)
				.is_err()
		);
		assert!(converter.to_store_value(Value::Float8(1.5), &Type::Int4).is_err());
	}
}
