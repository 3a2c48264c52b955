// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Arc;

use tandem_core::{Entity, Error};
use tandem_plan::{PlanExpr, UnaryOp};
use tandem_type::Value;

use crate::execute::query::compile_node;

mod binary;

pub(crate) use binary::apply_binary;

/// One evaluated value: either a scalar or a row with named fields.
/// Field names are shared per source, rows carry only their values.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
	Scalar(Value),
	Row {
		names: Arc<Vec<String>>,
		values: Vec<Value>,
	},
}

impl Datum {
	pub fn scalar(value: Value) -> Datum {
		Datum::Scalar(value)
	}

	pub fn row(names: Arc<Vec<String>>, entity: Entity) -> Datum {
		Datum::Row { names, values: entity.into_values() }
	}

	pub fn into_scalar(self) -> tandem_core::Result<Value> {
		match self {
			Datum::Scalar(value) => Ok(value),
			Datum::Row { .. } => Err(Error::unsupported_expression(
				"row value in scalar position",
			)),
		}
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		match self {
			Datum::Row { names, values } => {
				let index = names.iter().position(|n| n == name)?;
				values.get(index)
			}
			Datum::Scalar(_) => None,
		}
	}
}

/// Mutable evaluation state of one statement execution: converted
/// parameter values by slot and the stack of row bindings, innermost
/// last.
pub struct EvalContext {
	params: Vec<Value>,
	env: Vec<Datum>,
}

impl EvalContext {
	pub fn new(params: Vec<Value>) -> EvalContext {
		EvalContext { params, env: Vec::new() }
	}

	pub fn push_row(&mut self, datum: Datum) {
		self.env.push(datum);
	}

	pub fn pop_row(&mut self) {
		self.env.pop();
	}

	fn parameter(&self, slot: usize) -> tandem_core::Result<Value> {
		self.params.get(slot).cloned().ok_or_else(|| {
			Error::parameter_binding(format!("parameter slot {slot} is out of range"))
		})
	}

	fn variable(&self, depth: usize) -> tandem_core::Result<Datum> {
		let len = self.env.len();
		if depth < len {
			Ok(self.env[len - 1 - depth].clone())
		} else {
			Err(Error::unsupported_expression(format!(
				"row variable at depth {depth} is out of scope"
			)))
		}
	}
}

/// Evaluates a scalar- or row-valued plan expression. Sequence-valued
/// inputs of aggregates are drained through the query operators.
pub fn eval(expr: &PlanExpr, ctx: &mut EvalContext) -> tandem_core::Result<Datum> {
	match expr {
		PlanExpr::Var(depth) => ctx.variable(*depth),
		PlanExpr::Parameter(slot) => Ok(Datum::Scalar(ctx.parameter(*slot)?)),
		PlanExpr::Constant(value) => Ok(Datum::Scalar(value.clone())),
		PlanExpr::Field { input, index, name } => {
			match eval(input, ctx)? {
				// navigation over a missing row yields undefined
				Datum::Scalar(Value::Undefined) => Ok(Datum::Scalar(Value::Undefined)),
				Datum::Scalar(_) => Err(Error::unsupported_expression(format!(
					"field access {name} on a scalar value"
				))),
				Datum::Row { values, .. } => {
					values.get(*index).cloned().map(Datum::Scalar).ok_or_else(
						|| {
							Error::unsupported_expression(format!(
								"field {name} is out of range"
							))
						},
					)
				}
			}
		}
		PlanExpr::Record(fields) => {
			let mut names = Vec::with_capacity(fields.len());
			let mut values = Vec::with_capacity(fields.len());
			for (name, field) in fields {
				names.push(name.clone());
				values.push(eval(field, ctx)?.into_scalar()?);
			}
			Ok(Datum::Row { names: Arc::new(names), values })
		}
		PlanExpr::Binary { op, left, right } => {
			let left = eval(left, ctx)?.into_scalar()?;
			let right = eval(right, ctx)?.into_scalar()?;
			Ok(Datum::Scalar(apply_binary(*op, left, right)?))
		}
		PlanExpr::Unary { op, expr } => {
			let value = eval(expr, ctx)?.into_scalar()?;
			Ok(Datum::Scalar(apply_unary(*op, value)?))
		}
		PlanExpr::FirstOrDefault(input) => {
			let mut node = compile_node(input)?;
			match node.next(ctx)? {
				Some(datum) => Ok(datum),
				None => Ok(Datum::Scalar(Value::Undefined)),
			}
		}
		PlanExpr::Sum { input, null_aware } => {
			Ok(Datum::Scalar(eval_sum(input, *null_aware, ctx)?))
		}
		PlanExpr::Source(_)
		| PlanExpr::Filter { .. }
		| PlanExpr::Map { .. }
		| PlanExpr::Singleton(_) => Err(Error::unsupported_expression(
			"sequence value in scalar position",
		)),
	}
}

fn eval_sum(
	input: &PlanExpr,
	null_aware: bool,
	ctx: &mut EvalContext,
) -> tandem_core::Result<Value> {
	let mut node = compile_node(input)?;
	let mut int_sum: i64 = 0;
	let mut float_sum: f64 = 0.0;
	let mut is_float = false;
	let mut any_defined = false;

	while let Some(datum) = node.next(ctx)? {
		let value = datum.into_scalar()?;
		if value.is_undefined() {
			continue;
		}
		match value {
			Value::Float8(v) => {
				if !is_float {
					float_sum = int_sum as f64;
					is_float = true;
				}
				float_sum += v;
			}
			other => match other.as_i64() {
				Some(v) => {
					if is_float {
						float_sum += v as f64;
					} else {
						int_sum = int_sum.wrapping_add(v);
					}
				}
				None => {
					return Err(Error::unsupported_expression(format!(
						"sum over non-numeric value of type {}",
						other.ty()
					)));
				}
			},
		}
		any_defined = true;
	}

	if !any_defined {
		return Ok(if null_aware { Value::Undefined } else { Value::Int8(0) });
	}
	Ok(if is_float { Value::Float8(float_sum) } else { Value::Int8(int_sum) })
}

fn apply_unary(op: UnaryOp, value: Value) -> tandem_core::Result<Value> {
	if value.is_undefined() {
		return Ok(Value::Undefined);
	}
	match (op, value) {
		(UnaryOp::Not, Value::Bool(v)) => Ok(Value::Bool(!v)),
		(UnaryOp::Neg, Value::Int1(v)) => Ok(Value::Int1(v.wrapping_neg())),
		(UnaryOp::Neg, Value::Int2(v)) => Ok(Value::Int2(v.wrapping_neg())),
		(UnaryOp::Neg, Value::Int4(v)) => Ok(Value::Int4(v.wrapping_neg())),
		(UnaryOp::Neg, Value::Int8(v)) => Ok(Value::Int8(v.wrapping_neg())),
		(UnaryOp::Neg, Value::Float8(v)) => Ok(Value::Float8(-v)),
		(op, value) => Err(Error::unsupported_expression(format!(
			"unary {op:?} on value of type {}",
			value.ty()
		))),
	}
}
