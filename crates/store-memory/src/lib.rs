// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Arc;

use dashmap::DashMap;
use tandem_core::interface::{Table, TableProvider};
use tandem_core::{Error, TableSchema};

pub use table::MemoryTable;

mod sequence;
mod table;

/// Registry of in-memory tables, the default table provider of an
/// emulator or accelerator container.
pub struct MemoryStore {
	tables: DashMap<String, Arc<MemoryTable>>,
}

impl MemoryStore {
	pub fn new() -> MemoryStore {
		MemoryStore { tables: DashMap::new() }
	}

	pub fn create_table(
		&self,
		name: impl Into<String>,
		schema: TableSchema,
	) -> tandem_core::Result<Arc<MemoryTable>> {
		let name = name.into();
		let table = Arc::new(MemoryTable::new(schema));
		if self.tables.insert(name.clone(), Arc::clone(&table)).is_some() {
			return Err(Error::Configuration {
				detail: format!("table {name} already exists"),
			});
		}
		Ok(table)
	}
}

impl Default for MemoryStore {
	fn default() -> MemoryStore {
		MemoryStore::new()
	}
}

impl TableProvider for MemoryStore {
	fn get_table(&self, name: &str) -> tandem_core::Result<Arc<dyn Table>> {
		self.tables
			.get(name)
			.map(|entry| Arc::clone(entry.value()) as Arc<dyn Table>)
			.ok_or_else(|| Error::UnknownTable { name: name.to_string() })
	}
}

#[cfg(test)]
mod tests {
	use tandem_core::FieldDef;
	use tandem_type::Type;

	use super::*;

	#[test]
	fn test_get_table_after_create() {
		let store = MemoryStore::new();
		store
			.create_table(
				"person",
				TableSchema::new(vec![FieldDef::new("name", Type::Utf8)]),
			)
			.unwrap();
		assert!(store.get_table("person").is_ok());
	}

	#[test]
	fn test_unknown_table() {
		let store = MemoryStore::new();
		let err = store.get_table("ghost").unwrap_err();
		assert_eq!(err, Error::UnknownTable { name: "ghost".to_string() });
	}

	#[test]
	fn test_duplicate_table() {
		let store = MemoryStore::new();
		let schema = || TableSchema::new(vec![FieldDef::new("name", Type::Utf8)]);
		store.create_table("person", schema()).unwrap();
		assert!(store.create_table("person", schema()).is_err());
	}
}
