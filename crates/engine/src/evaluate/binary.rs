// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::cmp::Ordering;

use tandem_core::Error;
use tandem_plan::BinaryOp;
use tandem_type::Value;

/// Applies a binary operator with SQL three-valued semantics:
/// `Undefined` operands propagate, except where a boolean connective
/// is already decided by its defined side.
pub(crate) fn apply_binary(
	op: BinaryOp,
	left: Value,
	right: Value,
) -> tandem_core::Result<Value> {
	match op {
		BinaryOp::And => Ok(apply_and(left, right)),
		BinaryOp::Or => Ok(apply_or(left, right)),
		BinaryOp::Eq
		| BinaryOp::NotEq
		| BinaryOp::LessThan
		| BinaryOp::LessThanEq
		| BinaryOp::GreaterThan
		| BinaryOp::GreaterThanEq => apply_comparison(op, left, right),
		BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
			apply_arithmetic(op, left, right)
		}
	}
}

fn apply_and(left: Value, right: Value) -> Value {
	match (left, right) {
		(Value::Bool(false), _) | (_, Value::Bool(false)) => Value::Bool(false),
		(Value::Bool(l), Value::Bool(r)) => Value::Bool(l && r),
		_ => Value::Undefined,
	}
}

fn apply_or(left: Value, right: Value) -> Value {
	match (left, right) {
		(Value::Bool(true), _) | (_, Value::Bool(true)) => Value::Bool(true),
		(Value::Bool(l), Value::Bool(r)) => Value::Bool(l || r),
		_ => Value::Undefined,
	}
}

fn apply_comparison(op: BinaryOp, left: Value, right: Value) -> tandem_core::Result<Value> {
	if left.is_undefined() || right.is_undefined() {
		return Ok(Value::Undefined);
	}
	let ordering = compare(&left, &right)?;
	let result = match op {
		BinaryOp::Eq => ordering == Ordering::Equal,
		BinaryOp::NotEq => ordering != Ordering::Equal,
		BinaryOp::LessThan => ordering == Ordering::Less,
		BinaryOp::LessThanEq => ordering != Ordering::Greater,
		BinaryOp::GreaterThan => ordering == Ordering::Greater,
		BinaryOp::GreaterThanEq => ordering != Ordering::Less,
		_ => unreachable!("non-comparison operator"),
	};
	Ok(Value::Bool(result))
}

fn compare(left: &Value, right: &Value) -> tandem_core::Result<Ordering> {
	// exact integer comparison before falling back to floats
	if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
		return Ok(l.cmp(&r));
	}
	if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
		return Ok(l.partial_cmp(&r).unwrap_or(Ordering::Equal));
	}
	match (left, right) {
		(Value::Utf8(l), Value::Utf8(r)) => Ok(l.cmp(r)),
		(Value::Bool(l), Value::Bool(r)) => Ok(l.cmp(r)),
		(l, r) => Err(Error::unsupported_expression(format!(
			"comparison between {} and {}",
			l.ty(),
			r.ty()
		))),
	}
}

fn apply_arithmetic(op: BinaryOp, left: Value, right: Value) -> tandem_core::Result<Value> {
	if left.is_undefined() || right.is_undefined() {
		return Ok(Value::Undefined);
	}
	if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
		let result = match op {
			BinaryOp::Add => Some(l.wrapping_add(r)),
			BinaryOp::Sub => Some(l.wrapping_sub(r)),
			BinaryOp::Mul => Some(l.wrapping_mul(r)),
			BinaryOp::Div => l.checked_div(r),
			BinaryOp::Rem => l.checked_rem(r),
			_ => unreachable!("non-arithmetic operator"),
		};
		// division by zero has no defined result
		return Ok(result.map(Value::Int8).unwrap_or(Value::Undefined));
	}
	if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
		let result = match op {
			BinaryOp::Add => l + r,
			BinaryOp::Sub => l - r,
			BinaryOp::Mul => l * r,
			BinaryOp::Div => l / r,
			BinaryOp::Rem => l % r,
			_ => unreachable!("non-arithmetic operator"),
		};
		return Ok(Value::Float8(result));
	}
	Err(Error::unsupported_expression(format!(
		"arithmetic between {} and {}",
		left.ty(),
		right.ty()
	)))
}
