// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tandem_type::{Type, Value};

/// A single materialized row, field values in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
	values: Vec<Value>,
}

impl Entity {
	pub fn new(values: Vec<Value>) -> Entity {
		Entity { values }
	}

	pub fn get(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	pub fn set(&mut self, index: usize, value: Value) {
		if index < self.values.len() {
			self.values[index] = value;
		}
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	pub fn into_values(self) -> Vec<Value> {
		self.values
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Declared field of a table: name, store type and whether the store
/// generates its value on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
	pub name: String,
	pub ty: Type,
	pub generated: bool,
}

impl FieldDef {
	pub fn new(name: impl Into<String>, ty: Type) -> FieldDef {
		FieldDef { name: name.into(), ty, generated: false }
	}

	pub fn generated(name: impl Into<String>, ty: Type) -> FieldDef {
		FieldDef { name: name.into(), ty, generated: true }
	}
}

/// Ordered field layout of a table. Field positions are stable, lookups
/// by name go through a prebuilt index.
#[derive(Debug, Clone)]
pub struct TableSchema {
	fields: Vec<FieldDef>,
	index: HashMap<String, usize>,
}

impl TableSchema {
	pub fn new(fields: Vec<FieldDef>) -> TableSchema {
		let index = fields
			.iter()
			.enumerate()
			.map(|(i, f)| (f.name.clone(), i))
			.collect();
		TableSchema { fields, index }
	}

	pub fn field_index(&self, name: &str) -> Option<usize> {
		self.index.get(name).copied()
	}

	pub fn field(&self, index: usize) -> Option<&FieldDef> {
		self.fields.get(index)
	}

	pub fn fields(&self) -> &[FieldDef] {
		&self.fields
	}

	pub fn field_names(&self) -> Vec<&str> {
		self.fields.iter().map(|f| f.name.as_str()).collect()
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

/// A row handed back to the caller after a modification, keyed by field
/// name in declaration order.
pub type ReturningRow = IndexMap<String, Value>;

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> TableSchema {
		TableSchema::new(vec![
			FieldDef::generated("id", Type::Int8),
			FieldDef::new("name", Type::Utf8),
			FieldDef::new("age", Type::Int4),
		])
	}

	#[test]
	fn test_field_index() {
		let schema = schema();
		assert_eq!(schema.field_index("id"), Some(0));
		assert_eq!(schema.field_index("age"), Some(2));
		assert_eq!(schema.field_index("missing"), None);
	}

	#[test]
	fn test_field_names_preserve_order() {
		let schema = schema();
		assert_eq!(schema.field_names(), vec!["id", "name", "age"]);
	}

	#[test]
	fn test_generated_flag() {
		let schema = schema();
		assert!(schema.field(0).is_some_and(|f| f.generated));
		assert!(schema.field(1).is_some_and(|f| !f.generated));
	}

	#[test]
	fn test_entity_get_set() {
		let mut entity = Entity::new(vec![
			Value::Int8(1),
			Value::Utf8("ann".to_string()),
			Value::Int4(29),
		]);
		assert_eq!(entity.get(1), Some(&Value::Utf8("ann".to_string())));
		entity.set(2, Value::Int4(30));
		assert_eq!(entity.get(2), Some(&Value::Int4(30)));
		assert_eq!(entity.get(3), None);
	}
}
