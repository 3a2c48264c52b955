// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::collections::VecDeque;

use parking_lot::Mutex;
use tandem_core::interface::BackingConnection;
use tandem_core::{Error, ReturningRow};

/// Backing connection with scripted responses. Each call pops the next
/// scripted result and records the statement text, so suites can
/// assert both the outcome and the wire traffic.
#[derive(Default)]
pub struct ScriptedConnection {
	non_query_results: Mutex<VecDeque<usize>>,
	reader_results: Mutex<VecDeque<Vec<ReturningRow>>>,
	executed: Mutex<Vec<String>>,
	opened: Mutex<usize>,
}

impl ScriptedConnection {
	pub fn new() -> ScriptedConnection {
		ScriptedConnection::default()
	}

	pub fn script_non_query(&self, affected: usize) {
		self.non_query_results.lock().push_back(affected);
	}

	pub fn script_reader(&self, rows: Vec<ReturningRow>) {
		self.reader_results.lock().push_back(rows);
	}

	/// Statement texts in execution order.
	pub fn executed(&self) -> Vec<String> {
		self.executed.lock().clone()
	}

	pub fn open_count(&self) -> usize {
		*self.opened.lock()
	}
}

impl BackingConnection for ScriptedConnection {
	fn ensure_open(&self) -> tandem_core::Result<()> {
		*self.opened.lock() += 1;
		Ok(())
	}

	fn execute_non_query(&self, statement: &str) -> tandem_core::Result<usize> {
		self.executed.lock().push(statement.to_string());
		self.non_query_results.lock().pop_front().ok_or_else(|| {
			Error::Backing(format!("no scripted result for statement: {statement}"))
		})
	}

	fn execute_reader(&self, statement: &str) -> tandem_core::Result<Vec<ReturningRow>> {
		self.executed.lock().push(statement.to_string());
		self.reader_results.lock().pop_front().ok_or_else(|| {
			Error::Backing(format!("no scripted rows for statement: {statement}"))
		})
	}
}
