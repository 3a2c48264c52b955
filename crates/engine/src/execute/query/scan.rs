// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Arc;

use tandem_plan::TableHandle;

use crate::evaluate::{Datum, EvalContext};

use super::QueryNode;

/// Scans all rows of a table. The table is snapshotted on the first
/// pull, so a stream created before a modification still observes it.
pub(crate) struct ScanNode {
	handle: TableHandle,
	names: Arc<Vec<String>>,
	rows: Option<std::vec::IntoIter<tandem_core::Entity>>,
}

impl ScanNode {
	pub(crate) fn new(handle: TableHandle) -> ScanNode {
		let names = Arc::new(
			handle.schema().field_names().iter().map(|n| n.to_string()).collect(),
		);
		ScanNode { handle, names, rows: None }
	}
}

impl QueryNode for ScanNode {
	fn next(&mut self, _ctx: &mut EvalContext) -> tandem_core::Result<Option<Datum>> {
		let rows = self
			.rows
			.get_or_insert_with(|| self.handle.table().scan().into_iter());
		Ok(rows.next().map(|entity| Datum::row(Arc::clone(&self.names), entity)))
	}
}
