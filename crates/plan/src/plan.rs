// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use tandem_core::{TableSchema, interface::Table};
use tandem_type::Value;

use crate::{BinaryOp, ParameterDecl, UnaryOp};

/// Resolved reference to a store table, captured when the plan is
/// compiled. Handles compare by table name.
#[derive(Clone)]
pub struct TableHandle {
	name: String,
	table: Arc<dyn Table>,
}

impl TableHandle {
	pub fn new(name: impl Into<String>, table: Arc<dyn Table>) -> TableHandle {
		TableHandle { name: name.into(), table }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn table(&self) -> &Arc<dyn Table> {
		&self.table
	}

	pub fn schema(&self) -> &TableSchema {
		self.table.schema()
	}
}

impl Debug for TableHandle {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableHandle").field("name", &self.name).finish()
	}
}

impl PartialEq for TableHandle {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

/// Executable form of a statement body. Parameters are slot indices,
/// row variables are de Bruijn depths (0 is the innermost binding) and
/// property accesses are schema field indices, so execution never
/// resolves names.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanExpr {
	/// Sequence of all rows of a table.
	Source(TableHandle),
	Filter {
		input: Box<PlanExpr>,
		predicate: Box<PlanExpr>,
	},
	Map {
		input: Box<PlanExpr>,
		body: Box<PlanExpr>,
	},
	/// Row variable by binding depth.
	Var(usize),
	/// Field of a row value by schema position. The name is retained
	/// for diagnostics only.
	Field {
		input: Box<PlanExpr>,
		index: usize,
		name: String,
	},
	/// Declared parameter by slot.
	Parameter(usize),
	Constant(Value),
	/// Anonymous record with named fields in declaration order.
	Record(Vec<(String, PlanExpr)>),
	Binary {
		op: BinaryOp,
		left: Box<PlanExpr>,
		right: Box<PlanExpr>,
	},
	Unary {
		op: UnaryOp,
		expr: Box<PlanExpr>,
	},
	/// One-element sequence holding the operand value.
	Singleton(Box<PlanExpr>),
	/// First element of the input sequence, `Undefined` when empty.
	FirstOrDefault(Box<PlanExpr>),
	Sum {
		input: Box<PlanExpr>,
		null_aware: bool,
	},
}

/// Immutable compiled statement, shared between execution contexts
/// through the plan cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPlan {
	pub parameters: Vec<ParameterDecl>,
	pub body: PlanExpr,
}

impl CompiledPlan {
	pub fn new(parameters: Vec<ParameterDecl>, body: PlanExpr) -> CompiledPlan {
		CompiledPlan { parameters, body }
	}

	pub fn parameter_slot(&self, name: &str) -> Option<usize> {
		self.parameters.iter().position(|p| p.name == name)
	}
}
