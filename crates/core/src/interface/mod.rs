// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Arc;

use tandem_type::{Type, Value};

use crate::{Entity, ReturningRow, TableSchema};

/// Execution mode of a container. An emulator serves every statement
/// from the in-memory store alone; an accelerator additionally forwards
/// modifications to a backing database and reconciles the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
	Emulator,
	Accelerator,
}

impl ProviderMode {
	pub fn is_accelerator(&self) -> bool {
		matches!(self, ProviderMode::Accelerator)
	}
}

/// A single in-memory table. Implementations are internally
/// synchronized, callers share them behind `Arc`.
pub trait Table: Send + Sync + std::fmt::Debug {
	fn schema(&self) -> &TableSchema;

	/// Snapshots the current rows. The snapshot is stable against
	/// concurrent modification of the table.
	fn scan(&self) -> Vec<Entity>;

	/// Inserts a row and returns it with store-generated fields
	/// filled in.
	fn insert(&self, entity: Entity) -> crate::Result<Entity>;

	/// Removes the first row equal to `entity`. Returns whether a row
	/// was removed.
	fn delete(&self, entity: &Entity) -> crate::Result<bool>;

	/// Replaces the first row equal to `existing` with `updated`.
	/// Returns whether a row was replaced.
	fn replace(&self, existing: &Entity, updated: Entity) -> crate::Result<bool>;
}

/// Resolves table names against the store backing a container.
pub trait TableProvider: Send + Sync {
	fn get_table(&self, name: &str) -> crate::Result<Arc<dyn Table>>;
}

/// Converts values crossing the caller/store boundary.
pub trait ValueConverter: Send + Sync {
	/// Coerces a caller-supplied value to the declared store type.
	fn to_store_value(&self, value: Value, target: &Type) -> crate::Result<Value>;

	/// Maps a store value back into the caller domain.
	fn to_caller_value(&self, value: Value) -> crate::Result<Value>;
}

/// Connection to the backing database of an accelerator container.
pub trait BackingConnection: Send + Sync {
	fn ensure_open(&self) -> crate::Result<()>;

	/// Executes a statement and returns the affected row count.
	fn execute_non_query(&self, statement: &str) -> crate::Result<usize>;

	/// Executes a statement and drains its result rows.
	fn execute_reader(&self, statement: &str) -> crate::Result<Vec<ReturningRow>>;
}
