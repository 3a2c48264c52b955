// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use tandem_core::interface::BackingConnection;
use tandem_core::{Error, ReturningRow};
use tandem_type::Value;

/// Backing connection over a sqlite database, the accelerator
/// collaborator. The connection is serialized behind a mutex; callers
/// hand whole statement texts across and read back affected counts or
/// result rows.
pub struct SqliteConnection {
	conn: Mutex<Connection>,
}

impl SqliteConnection {
	pub fn open(path: impl AsRef<Path>) -> tandem_core::Result<SqliteConnection> {
		let conn = Connection::open(path).map_err(to_backing)?;
		Ok(SqliteConnection { conn: Mutex::new(conn) })
	}

	pub fn open_in_memory() -> tandem_core::Result<SqliteConnection> {
		let conn = Connection::open_in_memory().map_err(to_backing)?;
		Ok(SqliteConnection { conn: Mutex::new(conn) })
	}

	/// Runs a statement outside the engine protocol, e.g. schema
	/// setup.
	pub fn execute_batch(&self, sql: &str) -> tandem_core::Result<()> {
		self.conn.lock().execute_batch(sql).map_err(to_backing)
	}
}

fn to_backing(err: rusqlite::Error) -> Error {
	Error::Backing(err.to_string())
}

fn read_value(value: ValueRef<'_>) -> tandem_core::Result<Value> {
	match value {
		ValueRef::Null => Ok(Value::Undefined),
		ValueRef::Integer(v) => Ok(Value::Int8(v)),
		ValueRef::Real(v) => Ok(Value::Float8(v)),
		ValueRef::Text(text) => {
			Ok(Value::Utf8(String::from_utf8_lossy(text).into_owned()))
		}
		ValueRef::Blob(_) => {
			Err(Error::Backing("blob columns are not supported".to_string()))
		}
	}
}

impl BackingConnection for SqliteConnection {
	fn ensure_open(&self) -> tandem_core::Result<()> {
		self.conn
			.lock()
			.query_row("SELECT 1", [], |_| Ok(()))
			.map_err(to_backing)
	}

	fn execute_non_query(&self, statement: &str) -> tandem_core::Result<usize> {
		self.conn.lock().execute(statement, []).map_err(to_backing)
	}

	fn execute_reader(&self, statement: &str) -> tandem_core::Result<Vec<ReturningRow>> {
		let conn = self.conn.lock();
		let mut stmt = conn.prepare(statement).map_err(to_backing)?;
		let names: Vec<String> =
			stmt.column_names().iter().map(|name| name.to_string()).collect();
		let mut rows = stmt.query([]).map_err(to_backing)?;
		let mut result = Vec::new();
		while let Some(row) = rows.next().map_err(to_backing)? {
			let mut record = ReturningRow::new();
			for (index, name) in names.iter().enumerate() {
				let value = read_value(row.get_ref(index).map_err(to_backing)?)?;
				record.insert(name.clone(), value);
			}
			result.push(record);
		}
		Ok(result)
	}
}
