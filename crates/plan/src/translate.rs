// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tandem_core::{Error, interface::TableProvider};
use tracing::trace;

use crate::{
	CommandKind, CommandTree, CompiledPlan, Expression, ParameterDecl, PlanExpr, TableHandle,
	TargetBinding, postprocess,
};

/// Compiles a command tree into an executable plan: lowers the caller
/// expression to the executable form and runs the postprocessing
/// rewrites. The input tree is never mutated.
pub fn compile(
	tree: &CommandTree,
	provider: &dyn TableProvider,
) -> tandem_core::Result<CompiledPlan> {
	let mut translator = Translator::new(&tree.parameters, provider);
	let body = match &tree.kind {
		CommandKind::Query { root } => translator.translate(root)?,
		CommandKind::Insert { target, .. } => match target {
			Expression::Scan(_) => translator.translate(target)?,
			other => {
				return Err(Error::unsupported_command_shape(format!(
					"insert target must be a table scan, got {}",
					other.kind()
				)));
			}
		},
		CommandKind::Update { target, predicate, .. } => {
			translator.translate_target(target, predicate.as_ref())?
		}
		CommandKind::Delete { target, predicate } => {
			translator.translate_target(target, predicate.as_ref())?
		}
	};
	Ok(CompiledPlan::new(tree.parameters.clone(), postprocess::run(body)))
}

/// Field layout of a row value, used to turn property accesses into
/// positional field reads.
#[derive(Debug, Clone)]
enum RowShape {
	Fields(Vec<String>),
	Opaque,
}

struct ScopeEntry {
	name: String,
	shape: RowShape,
}

/// Lowers caller expressions to the executable form against a fixed
/// parameter list and table provider. Row variables live on a scope
/// stack that is pushed and popped around each binding body.
pub struct Translator<'a> {
	parameters: &'a [ParameterDecl],
	provider: &'a dyn TableProvider,
	scope: Vec<ScopeEntry>,
}

impl<'a> Translator<'a> {
	pub fn new(parameters: &'a [ParameterDecl], provider: &'a dyn TableProvider) -> Translator<'a> {
		Translator { parameters, provider, scope: Vec::new() }
	}

	pub fn translate(&mut self, expr: &Expression) -> tandem_core::Result<PlanExpr> {
		match expr {
			Expression::Scan(name) => {
				let table = self.provider.get_table(name)?;
				trace!(table = name.as_str(), "resolved scan target");
				Ok(PlanExpr::Source(TableHandle::new(name.clone(), table)))
			}
			Expression::Filter { source, variable, predicate } => {
				let input = self.translate(source)?;
				let shape = self.element_shape(&input);
				let predicate =
					self.with_variable(variable, shape, |t| t.translate(predicate))?;
				Ok(PlanExpr::Filter {
					input: Box::new(input),
					predicate: Box::new(predicate),
				})
			}
			Expression::Project { source, variable, body } => {
				let input = self.translate(source)?;
				let shape = self.element_shape(&input);
				let body = self.with_variable(variable, shape, |t| t.translate(body))?;
				Ok(PlanExpr::Map { input: Box::new(input), body: Box::new(body) })
			}
			Expression::Variable(name) => {
				let depth = self
					.scope
					.iter()
					.rev()
					.position(|entry| entry.name == *name)
					.ok_or_else(|| {
						Error::unsupported_expression(format!(
							"unresolved variable {name}"
						))
					})?;
				Ok(PlanExpr::Var(depth))
			}
			Expression::Parameter(name) => {
				let slot = self
					.parameters
					.iter()
					.position(|p| p.name == *name)
					.ok_or_else(|| {
						Error::parameter_binding(format!(
							"parameter {name} is not declared"
						))
					})?;
				Ok(PlanExpr::Parameter(slot))
			}
			Expression::Property { instance, name } => {
				let input = self.translate(instance)?;
				let names = match self.value_shape(&input) {
					RowShape::Fields(names) => names,
					RowShape::Opaque => {
						return Err(Error::unsupported_expression(format!(
							"property access {name} on a value without field layout"
						)));
					}
				};
				let index = names.iter().position(|n| n == name).ok_or_else(|| {
					Error::unsupported_expression(format!("unknown property {name}"))
				})?;
				Ok(PlanExpr::Field {
					input: Box::new(input),
					index,
					name: name.clone(),
				})
			}
			Expression::Constant(value) => Ok(PlanExpr::Constant(value.clone())),
			Expression::NewInstance(fields) => {
				let mut lowered = Vec::with_capacity(fields.len());
				for (name, field) in fields {
					lowered.push((name.clone(), self.translate(field)?));
				}
				Ok(PlanExpr::Record(lowered))
			}
			Expression::Binary { op, left, right } => Ok(PlanExpr::Binary {
				op: *op,
				left: Box::new(self.translate(left)?),
				right: Box::new(self.translate(right)?),
			}),
			Expression::Unary { op, expr } => Ok(PlanExpr::Unary {
				op: *op,
				expr: Box::new(self.translate(expr)?),
			}),
			Expression::Call { function, args } => self.translate_call(function, args),
		}
	}

	/// Lowers a modification target and optional predicate into the
	/// candidate-row selection: a filter over the target scan, or the
	/// bare scan when there is no predicate.
	pub fn translate_target(
		&mut self,
		target: &TargetBinding,
		predicate: Option<&Expression>,
	) -> tandem_core::Result<PlanExpr> {
		let source = self.translate(&target.source)?;
		match predicate {
			Some(predicate) => {
				let shape = self.element_shape(&source);
				let predicate = self
					.with_variable(&target.variable, shape, |t| {
						t.translate(predicate)
					})?;
				Ok(PlanExpr::Filter {
					input: Box::new(source),
					predicate: Box::new(predicate),
				})
			}
			None => Ok(source),
		}
	}

	/// Lowers `expr` with `variable` bound to one row of `source`.
	/// Used for set-clause values that reference the target row.
	pub fn translate_in_row_scope(
		&mut self,
		variable: &str,
		source: &PlanExpr,
		expr: &Expression,
	) -> tandem_core::Result<PlanExpr> {
		let shape = self.element_shape(source);
		self.with_variable(variable, shape, |t| t.translate(expr))
	}

	fn translate_call(
		&mut self,
		function: &str,
		args: &[Expression],
	) -> tandem_core::Result<PlanExpr> {
		match (function, args) {
			("sum", [input]) => Ok(PlanExpr::Sum {
				input: Box::new(self.translate(input)?),
				null_aware: false,
			}),
			("first_or_default", [input]) => {
				Ok(PlanExpr::FirstOrDefault(Box::new(self.translate(input)?)))
			}
			("singleton", [value]) => {
				Ok(PlanExpr::Singleton(Box::new(self.translate(value)?)))
			}
			_ => Err(Error::unsupported_expression(format!(
				"call to {function} with {} arguments",
				args.len()
			))),
		}
	}

	fn with_variable<T>(
		&mut self,
		name: &str,
		shape: RowShape,
		f: impl FnOnce(&mut Self) -> tandem_core::Result<T>,
	) -> tandem_core::Result<T> {
		self.scope.push(ScopeEntry { name: name.to_string(), shape });
		let result = f(self);
		self.scope.pop();
		result
	}

	/// Shape of one element of a sequence-valued plan.
	fn element_shape(&self, plan: &PlanExpr) -> RowShape {
		match plan {
			PlanExpr::Source(handle) => RowShape::Fields(
				handle.schema().field_names().iter().map(|n| n.to_string()).collect(),
			),
			PlanExpr::Filter { input, .. } => self.element_shape(input),
			PlanExpr::Map { body, .. } => self.value_shape(body),
			PlanExpr::Singleton(value) => self.value_shape(value),
			_ => RowShape::Opaque,
		}
	}

	/// Shape of a scalar- or row-valued plan.
	fn value_shape(&self, plan: &PlanExpr) -> RowShape {
		match plan {
			PlanExpr::Var(depth) => {
				let len = self.scope.len();
				if *depth < len {
					self.scope[len - 1 - depth].shape.clone()
				} else {
					RowShape::Opaque
				}
			}
			PlanExpr::Record(fields) => {
				RowShape::Fields(fields.iter().map(|(n, _)| n.clone()).collect())
			}
			PlanExpr::FirstOrDefault(input) => self.element_shape(input),
			_ => RowShape::Opaque,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;
	use std::sync::Arc;

	use tandem_core::interface::Table;
	use tandem_core::{Entity, FieldDef, TableSchema};
	use tandem_type::{Type, Value};

	use super::*;
	use crate::{BinaryOp, SetClause};

	#[derive(Debug)]
	struct FixtureTable {
		schema: TableSchema,
	}

	impl Table for FixtureTable {
		fn schema(&self) -> &TableSchema {
			&self.schema
		}

		fn scan(&self) -> Vec<Entity> {
			Vec::new()
		}

		fn insert(&self, entity: Entity) -> tandem_core::Result<Entity> {
			Ok(entity)
		}

		fn delete(&self, _entity: &Entity) -> tandem_core::Result<bool> {
			Ok(false)
		}

		fn replace(&self, _existing: &Entity, _updated: Entity) -> tandem_core::Result<bool> {
			Ok(false)
		}
	}

	struct FixtureProvider {
		tables: HashMap<String, Arc<dyn Table>>,
	}

	impl FixtureProvider {
		fn new() -> FixtureProvider {
			let mut tables: HashMap<String, Arc<dyn Table>> = HashMap::new();
			tables.insert(
				"person".to_string(),
				Arc::new(FixtureTable {
					schema: TableSchema::new(vec![
						FieldDef::generated("id", Type::Int8),
						FieldDef::new("name", Type::Utf8),
						FieldDef::new("age", Type::Int4),
					]),
				}),
			);
			FixtureProvider { tables }
		}
	}

	impl TableProvider for FixtureProvider {
		fn get_table(&self, name: &str) -> tandem_core::Result<Arc<dyn Table>> {
			self.tables
				.get(name)
				.cloned()
				.ok_or_else(|| Error::UnknownTable { name: name.to_string() })
		}
	}

	fn property(variable: &str, name: &str) -> Expression {
		Expression::Property {
			instance: Box::new(Expression::Variable(variable.to_string())),
			name: name.to_string(),
		}
	}

	fn filter_person_by_age() -> Expression {
		Expression::Filter {
			source: Box::new(Expression::Scan("person".to_string())),
			variable: "p".to_string(),
			predicate: Box::new(Expression::Binary {
				op: BinaryOp::GreaterThan,
				left: Box::new(property("p", "age")),
				right: Box::new(Expression::Parameter("min_age".to_string())),
			}),
		}
	}

	#[test]
	fn test_translate_filter_resolves_fields_and_slots() {
		let provider = FixtureProvider::new();
		let parameters = vec![ParameterDecl::new("min_age", Type::Int4)];
		let mut translator = Translator::new(&parameters, &provider);

		let plan = translator.translate(&filter_person_by_age()).unwrap();
		match plan {
			PlanExpr::Filter { predicate, .. } => match *predicate {
				PlanExpr::Binary { op: BinaryOp::GreaterThan, left, right } => {
					assert_eq!(
						*left,
						PlanExpr::Field {
							input: Box::new(PlanExpr::Var(0)),
							index: 2,
							name: "age".to_string(),
						}
					);
					assert_eq!(*right, PlanExpr::Parameter(0));
				}
				other => panic!("unexpected predicate: {other:?}"),
			},
			other => panic!("unexpected plan: {other:?}"),
		}
	}

	#[test]
	fn test_nested_variables_shadow_by_depth() {
		let provider = FixtureProvider::new();
		let parameters = Vec::new();
		let mut translator = Translator::new(&parameters, &provider);

		// outer row is referenced from inside the inner filter
		let expr = Expression::Filter {
			source: Box::new(Expression::Scan("person".to_string())),
			variable: "outer".to_string(),
			predicate: Box::new(Expression::Call {
				function: "first_or_default".to_string(),
				args: vec![Expression::Filter {
					source: Box::new(Expression::Scan("person".to_string())),
					variable: "inner".to_string(),
					predicate: Box::new(Expression::Binary {
						op: BinaryOp::Eq,
						left: Box::new(property("inner", "id")),
						right: Box::new(property("outer", "id")),
					}),
				}],
			}),
		};

		let plan = translator.translate(&expr).unwrap();
		let PlanExpr::Filter { predicate, .. } = plan else {
			panic!("expected filter");
		};
		let PlanExpr::FirstOrDefault(inner) = *predicate else {
			panic!("expected first_or_default");
		};
		let PlanExpr::Filter { predicate, .. } = *inner else {
			panic!("expected inner filter");
		};
		let PlanExpr::Binary { left, right, .. } = *predicate else {
			panic!("expected comparison");
		};
		assert_eq!(
			*left,
			PlanExpr::Field {
				input: Box::new(PlanExpr::Var(0)),
				index: 0,
				name: "id".to_string()
			}
		);
		assert_eq!(
			*right,
			PlanExpr::Field {
				input: Box::new(PlanExpr::Var(1)),
				index: 0,
				name: "id".to_string()
			}
		);
	}

	#[test]
	fn test_variable_does_not_leak_out_of_binding() {
		let provider = FixtureProvider::new();
		let parameters = Vec::new();
		let mut translator = Translator::new(&parameters, &provider);

		translator.translate(&filter_person_by_age()).unwrap_err();
		let err = translator
			.translate(&Expression::Variable("p".to_string()))
			.unwrap_err();
		assert_eq!(
			err,
			Error::UnsupportedExpression { kind: "unresolved variable p".to_string() }
		);
	}

	#[test]
	fn test_unknown_table() {
		let provider = FixtureProvider::new();
		let parameters = Vec::new();
		let mut translator = Translator::new(&parameters, &provider);

		let err = translator.translate(&Expression::Scan("ghost".to_string())).unwrap_err();
		assert_eq!(err, Error::UnknownTable { name: "ghost".to_string() });
	}

	#[test]
	fn test_undeclared_parameter() {
		let provider = FixtureProvider::new();
		let parameters = Vec::new();
		let mut translator = Translator::new(&parameters, &provider);

		let err = translator
			.translate(&Expression::Parameter("missing".to_string()))
			.unwrap_err();
		assert_eq!(
			err,
			Error::ParameterBinding {
				detail: "parameter missing is not declared".to_string()
			}
		);
	}

	#[test]
	fn test_unknown_call_function() {
		let provider = FixtureProvider::new();
		let parameters = Vec::new();
		let mut translator = Translator::new(&parameters, &provider);

		let err = translator
			.translate(&Expression::Call { function: "now".to_string(), args: Vec::new() })
			.unwrap_err();
		assert_eq!(
			err,
			Error::UnsupportedExpression {
				kind: "call to now with 0 arguments".to_string()
			}
		);
	}

	#[test]
	fn test_property_on_record_projection() {
		let provider = FixtureProvider::new();
		let parameters = Vec::new();
		let mut translator = Translator::new(&parameters, &provider);

		let expr = Expression::Project {
			source: Box::new(Expression::Project {
				source: Box::new(Expression::Scan("person".to_string())),
				variable: "p".to_string(),
				body: Box::new(Expression::NewInstance(vec![(
					"years".to_string(),
					property("p", "age"),
				)])),
			}),
			variable: "r".to_string(),
			body: Box::new(property("r", "years")),
		};

		let plan = translator.translate(&expr).unwrap();
		let PlanExpr::Map { body, .. } = plan else {
			panic!("expected projection");
		};
		assert_eq!(
			*body,
			PlanExpr::Field {
				input: Box::new(PlanExpr::Var(0)),
				index: 0,
				name: "years".to_string()
			}
		);
	}

	#[test]
	fn test_compile_rejects_non_scan_insert_target() {
		let provider = FixtureProvider::new();
		let tree = CommandTree::new(
			Vec::new(),
			CommandKind::Insert {
				target: Expression::Variable("x".to_string()),
				set_clauses: vec![SetClause::new(
					property("row", "age"),
					Expression::Constant(Value::Int4(1)),
				)],
				returning: None,
			},
		);
		let err = compile(&tree, &provider).unwrap_err();
		assert!(matches!(err, Error::UnsupportedCommandShape { .. }));
	}

	#[test]
	fn test_compile_delete_without_predicate_is_bare_scan() {
		let provider = FixtureProvider::new();
		let tree = CommandTree::new(
			Vec::new(),
			CommandKind::Delete {
				target: TargetBinding::new(
					Expression::Scan("person".to_string()),
					"p",
				),
				predicate: None,
			},
		);
		let plan = compile(&tree, &provider).unwrap();
		assert!(matches!(plan.body, PlanExpr::Source(_)));
	}
}
