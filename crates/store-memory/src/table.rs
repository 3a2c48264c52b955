// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use parking_lot::RwLock;
use tandem_core::interface::Table;
use tandem_core::{Entity, Error, TableSchema};
use tandem_type::{Type, Value};

use crate::sequence::SequenceGenerator;

/// One in-memory table: a schema, a row vector behind a lock and a
/// sequence for generated integer fields.
#[derive(Debug)]
pub struct MemoryTable {
	schema: TableSchema,
	rows: RwLock<Vec<Entity>>,
	sequence: SequenceGenerator,
}

impl MemoryTable {
	pub fn new(schema: TableSchema) -> MemoryTable {
		MemoryTable { schema, rows: RwLock::new(Vec::new()), sequence: SequenceGenerator::new() }
	}

	pub fn len(&self) -> usize {
		self.rows.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.read().is_empty()
	}

	fn generated_value(&self, ty: Type) -> tandem_core::Result<Value> {
		let next = self.sequence.next();
		match ty {
			Type::Int1 => Ok(Value::Int1(next as i8)),
			Type::Int2 => Ok(Value::Int2(next as i16)),
			Type::Int4 => Ok(Value::Int4(next as i32)),
			Type::Int8 => Ok(Value::Int8(next)),
			other => Err(Error::Configuration {
				detail: format!("generated fields of type {other} are not supported"),
			}),
		}
	}
}

impl Table for MemoryTable {
	fn schema(&self) -> &TableSchema {
		&self.schema
	}

	fn scan(&self) -> Vec<Entity> {
		self.rows.read().clone()
	}

	fn insert(&self, mut entity: Entity) -> tandem_core::Result<Entity> {
		for (index, field) in self.schema.fields().iter().enumerate() {
			if !field.generated {
				continue;
			}
			match entity.get(index) {
				Some(Value::Undefined) | None => {
					entity.set(index, self.generated_value(field.ty)?);
				}
				Some(value) => {
					// an externally assigned value moves the
					// sequence past it
					if let Some(assigned) = value.as_i64() {
						self.sequence.observe(assigned);
					}
				}
			}
		}
		self.rows.write().push(entity.clone());
		Ok(entity)
	}

	fn delete(&self, entity: &Entity) -> tandem_core::Result<bool> {
		let mut rows = self.rows.write();
		match rows.iter().position(|row| row == entity) {
			Some(index) => {
				rows.remove(index);
				Ok(true)
			}
			None => Ok(false),
		}
	}

	fn replace(&self, existing: &Entity, updated: Entity) -> tandem_core::Result<bool> {
		let mut rows = self.rows.write();
		match rows.iter().position(|row| row == existing) {
			Some(index) => {
				rows[index] = updated;
				Ok(true)
			}
			None => Ok(false),
		}
	}
}

#[cfg(test)]
mod tests {
	use tandem_core::FieldDef;

	use super::*;

	fn person_table() -> MemoryTable {
		MemoryTable::new(TableSchema::new(vec![
			FieldDef::generated("id", Type::Int8),
			FieldDef::new("name", Type::Utf8),
		]))
	}

	fn row(id: Value, name: &str) -> Entity {
		Entity::new(vec![id, Value::Utf8(name.to_string())])
	}

	#[test]
	fn test_insert_fills_generated_field() {
		let table = person_table();
		let first = table.insert(row(Value::Undefined, "ann")).unwrap();
		let second = table.insert(row(Value::Undefined, "bob")).unwrap();
		assert_eq!(first.get(0), Some(&Value::Int8(1)));
		assert_eq!(second.get(0), Some(&Value::Int8(2)));
	}

	#[test]
	fn test_insert_observes_assigned_value() {
		let table = person_table();
		table.insert(row(Value::Int8(10), "ann")).unwrap();
		let next = table.insert(row(Value::Undefined, "bob")).unwrap();
		assert_eq!(next.get(0), Some(&Value::Int8(11)));
	}

	#[test]
	fn test_scan_is_a_snapshot() {
		let table = person_table();
		table.insert(row(Value::Undefined, "ann")).unwrap();
		let snapshot = table.scan();
		table.insert(row(Value::Undefined, "bob")).unwrap();
		assert_eq!(snapshot.len(), 1);
		assert_eq!(table.len(), 2);
	}

	#[test]
	fn test_delete_removes_first_match() {
		let table = person_table();
		let stored = table.insert(row(Value::Undefined, "ann")).unwrap();
		assert!(table.delete(&stored).unwrap());
		assert!(!table.delete(&stored).unwrap());
		assert!(table.is_empty());
	}

	#[test]
	fn test_replace_keeps_position() {
		let table = person_table();
		let ann = table.insert(row(Value::Undefined, "ann")).unwrap();
		table.insert(row(Value::Undefined, "bob")).unwrap();

		let mut renamed = ann.clone();
		renamed.set(1, Value::Utf8("anna".to_string()));
		assert!(table.replace(&ann, renamed.clone()).unwrap());

		let rows = table.scan();
		assert_eq!(rows[0], renamed);
		assert!(!table.replace(&ann, renamed).unwrap());
	}
}
