// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

pub use cache::PlanCache;
pub use expression::{BinaryOp, Expression, UnaryOp};
pub use plan::{CompiledPlan, PlanExpr, TableHandle};
pub use tandem_core::{Error, Result};
pub use translate::{Translator, compile};
pub use tree::{
	CommandKind, CommandTree, ParameterDecl, SetClause, TargetBinding, set_clause_fields,
};

pub mod postprocess;

mod cache;
mod expression;
mod plan;
mod translate;
mod tree;
