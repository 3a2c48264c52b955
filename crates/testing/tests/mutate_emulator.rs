// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Arc;

use tandem_core::Entity;
use tandem_core::interface::Table;
use tandem_engine::{ContainerOptions, DatabaseContainer, Statement};
use tandem_plan::{BinaryOp, CommandKind, CommandTree, ParameterDecl, TargetBinding};
use tandem_store_memory::{MemoryStore, MemoryTable};
use tandem_testing::build::{binary, constant, param, prop, scan, set};
use tandem_testing::person_schema;
use tandem_type::{Type, Value, params};

fn fixture() -> (DatabaseContainer, Arc<MemoryTable>) {
	let store = Arc::new(MemoryStore::new());
	let table = store.create_table("person", person_schema()).unwrap();
	let container = ContainerOptions::emulator().provider(store).build().unwrap();
	(container, table)
}

fn seed(table: &MemoryTable) {
	for (name, age) in [("ann", 29), ("bob", 35), ("cid", 41)] {
		table.insert(Entity::new(vec![
			Value::Undefined,
			Value::Utf8(name.to_string()),
			Value::Int4(age),
		]))
		.unwrap();
	}
}

fn insert_statement(returning: Option<Vec<String>>) -> Statement {
	let tree = CommandTree::new(
		vec![
			ParameterDecl::new("name", Type::Utf8),
			ParameterDecl::new("age", Type::Int4),
		],
		CommandKind::Insert {
			target: scan("person"),
			set_clauses: vec![
				set("row", "name", param("name")),
				set("row", "age", param("age")),
			],
			returning,
		},
	);
	Statement::new("insert into person (name, age) values (:name, :age)", tree)
}

fn bump_age_statement() -> Statement {
	let tree = CommandTree::new(
		vec![ParameterDecl::new("min_age", Type::Int4)],
		CommandKind::Update {
			target: TargetBinding::new(scan("person"), "p"),
			predicate: Some(binary(
				BinaryOp::GreaterThanEq,
				prop("p", "age"),
				param("min_age"),
			)),
			set_clauses: vec![set(
				"p",
				"age",
				binary(BinaryOp::Add, prop("p", "age"), constant(1)),
			)],
			returning: None,
		},
	);
	Statement::new("update person set age = age + 1 where age >= :min_age", tree)
}

#[test]
fn test_insert_fills_generated_id() {
	let (container, table) = fixture();
	let statement = insert_statement(Some(vec!["id".to_string(), "name".to_string()]));

	let (affected, rows) = container
		.execute_insert(&statement, &params! { name: "ann", age: 29 })
		.unwrap();
	assert_eq!(affected, 1);
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].get("id"), Some(&Value::Int8(1)));
	assert_eq!(rows[0].get("name"), Some(&Value::Utf8("ann".to_string())));

	let (_, rows) = container
		.execute_insert(&statement, &params! { name: "bob", age: 35 })
		.unwrap();
	assert_eq!(rows[0].get("id"), Some(&Value::Int8(2)));

	let stored = table.scan();
	assert_eq!(stored.len(), 2);
	assert_eq!(stored[0].get(2), Some(&Value::Int4(29)));
}

#[test]
fn test_insert_leaves_unassigned_fields_undefined() {
	let (container, table) = fixture();
	let tree = CommandTree::new(
		vec![ParameterDecl::new("name", Type::Utf8)],
		CommandKind::Insert {
			target: scan("person"),
			set_clauses: vec![set("row", "name", param("name"))],
			returning: None,
		},
	);
	let statement = Statement::new("insert into person (name) values (:name)", tree);

	let (affected, rows) =
		container.execute_insert(&statement, &params! { name: "ann" }).unwrap();
	assert_eq!(affected, 1);
	assert!(rows.is_empty());

	let stored = table.scan();
	assert_eq!(stored[0].get(0), Some(&Value::Int8(1)));
	assert_eq!(stored[0].get(2), Some(&Value::Undefined));
}

#[test]
fn test_update_reads_the_row_being_updated() {
	let (container, table) = fixture();
	seed(&table);

	let (affected, rows) = container
		.execute_update(&bump_age_statement(), &params! { min_age: 35 })
		.unwrap();
	assert_eq!(affected, 2);
	assert!(rows.is_empty());

	let ages: Vec<Value> =
		table.scan().iter().filter_map(|e| e.get(2).cloned()).collect();
	assert_eq!(ages, vec![Value::Int4(29), Value::Int4(36), Value::Int4(42)]);
}

#[test]
fn test_update_returning_reflects_updated_rows() {
	let (container, table) = fixture();
	seed(&table);

	let tree = CommandTree::new(
		Vec::new(),
		CommandKind::Update {
			target: TargetBinding::new(scan("person"), "p"),
			predicate: Some(binary(
				BinaryOp::Eq,
				prop("p", "name"),
				constant("ann"),
			)),
			set_clauses: vec![set("p", "age", constant(30))],
			returning: Some(vec!["name".to_string(), "age".to_string()]),
		},
	);
	let statement = Statement::new(
		"update person set age = 30 where name = 'ann' returning name, age",
		tree,
	);

	let (affected, rows) = container.execute_update(&statement, &params!()).unwrap();
	assert_eq!(affected, 1);
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].get("name"), Some(&Value::Utf8("ann".to_string())));
	assert_eq!(rows[0].get("age"), Some(&Value::Int4(30)));
}

#[test]
fn test_update_keeps_unassigned_fields() {
	let (container, table) = fixture();
	seed(&table);

	container.execute_update(&bump_age_statement(), &params! { min_age: 0 }).unwrap();

	let stored = table.scan();
	assert_eq!(stored[0].get(0), Some(&Value::Int8(1)));
	assert_eq!(stored[0].get(1), Some(&Value::Utf8("ann".to_string())));
}

#[test]
fn test_update_rejects_values_out_of_field_range() {
	let (container, table) = fixture();
	table.insert(Entity::new(vec![
		Value::Undefined,
		Value::Utf8("max".to_string()),
		Value::Int4(i32::MAX),
	]))
	.unwrap();

	let err = container
		.execute_update(&bump_age_statement(), &params! { min_age: 0 })
		.unwrap_err();
	assert!(matches!(err, tandem_core::Error::UnconvertibleValue { .. }));
}

#[test]
fn test_delete_with_predicate() {
	let (container, table) = fixture();
	seed(&table);

	let tree = CommandTree::new(
		vec![ParameterDecl::new("max_age", Type::Int4)],
		CommandKind::Delete {
			target: TargetBinding::new(scan("person"), "p"),
			predicate: Some(binary(
				BinaryOp::LessThan,
				prop("p", "age"),
				param("max_age"),
			)),
		},
	);
	let statement = Statement::new("delete from person where age < :max_age", tree);

	let (affected, rows) =
		container.execute_delete(&statement, &params! { max_age: 40 }).unwrap();
	assert_eq!(affected, 2);
	assert!(rows.is_empty());

	let remaining = table.scan();
	assert_eq!(remaining.len(), 1);
	assert_eq!(remaining[0].get(1), Some(&Value::Utf8("cid".to_string())));
}

#[test]
fn test_delete_without_predicate_removes_everything() {
	let (container, table) = fixture();
	seed(&table);

	let tree = CommandTree::new(
		Vec::new(),
		CommandKind::Delete {
			target: TargetBinding::new(scan("person"), "p"),
			predicate: None,
		},
	);
	let statement = Statement::new("delete from person", tree);

	let (affected, _) = container.execute_delete(&statement, &params!()).unwrap();
	assert_eq!(affected, 3);
	assert!(table.scan().is_empty());
}
