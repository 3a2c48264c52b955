// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tandem_core::{FieldDef, TableSchema};
use tandem_type::Type;

pub use scripted::ScriptedConnection;

pub mod build;

mod scripted;

/// Schema of the `person` table used across the workspace suites.
pub fn person_schema() -> TableSchema {
	TableSchema::new(vec![
		FieldDef::generated("id", Type::Int8),
		FieldDef::new("name", Type::Utf8),
		FieldDef::new("age", Type::Int4),
	])
}
