// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Fixed pipeline of pure rewrites applied to every compiled plan
//! body. Passes run in a fixed order and the pipeline is idempotent.

pub use init_unwrap::unwrap_initializer;
pub use single_result::unwrap_single_result;
pub use sum::null_aware_sum;

use crate::PlanExpr;

mod init_unwrap;
mod single_result;
mod sum;

pub fn run(expr: PlanExpr) -> PlanExpr {
	let expr = null_aware_sum(expr);
	let expr = unwrap_single_result(expr);
	unwrap_initializer(expr)
}

/// Bottom-up rewrite: children first, then the node itself.
pub(crate) fn rewrite(expr: PlanExpr, f: &impl Fn(PlanExpr) -> PlanExpr) -> PlanExpr {
	let expr = match expr {
		PlanExpr::Filter { input, predicate } => PlanExpr::Filter {
			input: Box::new(rewrite(*input, f)),
			predicate: Box::new(rewrite(*predicate, f)),
		},
		PlanExpr::Map { input, body } => PlanExpr::Map {
			input: Box::new(rewrite(*input, f)),
			body: Box::new(rewrite(*body, f)),
		},
		PlanExpr::Field { input, index, name } => PlanExpr::Field {
			input: Box::new(rewrite(*input, f)),
			index,
			name,
		},
		PlanExpr::Record(fields) => PlanExpr::Record(
			fields.into_iter().map(|(name, field)| (name, rewrite(field, f))).collect(),
		),
		PlanExpr::Binary { op, left, right } => PlanExpr::Binary {
			op,
			left: Box::new(rewrite(*left, f)),
			right: Box::new(rewrite(*right, f)),
		},
		PlanExpr::Unary { op, expr } => {
			PlanExpr::Unary { op, expr: Box::new(rewrite(*expr, f)) }
		}
		PlanExpr::Singleton(value) => PlanExpr::Singleton(Box::new(rewrite(*value, f))),
		PlanExpr::FirstOrDefault(input) => {
			PlanExpr::FirstOrDefault(Box::new(rewrite(*input, f)))
		}
		PlanExpr::Sum { input, null_aware } => PlanExpr::Sum {
			input: Box::new(rewrite(*input, f)),
			null_aware,
		},
		leaf @ (PlanExpr::Source(_)
		| PlanExpr::Var(_)
		| PlanExpr::Parameter(_)
		| PlanExpr::Constant(_)) => leaf,
	};
	f(expr)
}
