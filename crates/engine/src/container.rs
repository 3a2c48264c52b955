// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use tandem_core::interface::{BackingConnection, ProviderMode, TableProvider, ValueConverter};
use tandem_core::{Error, ReturningRow};
use tandem_plan::{CommandTree, CompiledPlan, PlanCache, compile};
use tandem_type::Params;
use tracing::debug;

use crate::StandardConverter;
use crate::execute::mutate::{self, MutationContext};
use crate::execute::query::{self, RowStream};

/// One executable statement: the raw text the plan cache is keyed by
/// (and the accelerator replays) together with its command tree.
#[derive(Debug, Clone)]
pub struct Statement {
	pub text: String,
	pub tree: CommandTree,
}

impl Statement {
	pub fn new(text: impl Into<String>, tree: CommandTree) -> Statement {
		Statement { text: text.into(), tree }
	}
}

/// Configuration of a [`DatabaseContainer`]. Accelerator mode requires
/// a backing connection; the converter defaults to the standard one.
pub struct ContainerOptions {
	mode: ProviderMode,
	provider: Option<Arc<dyn TableProvider>>,
	converter: Arc<dyn ValueConverter>,
	backing: Option<Arc<dyn BackingConnection>>,
}

impl ContainerOptions {
	pub fn emulator() -> ContainerOptions {
		ContainerOptions {
			mode: ProviderMode::Emulator,
			provider: None,
			converter: Arc::new(StandardConverter),
			backing: None,
		}
	}

	pub fn accelerator() -> ContainerOptions {
		ContainerOptions { mode: ProviderMode::Accelerator, ..ContainerOptions::emulator() }
	}

	pub fn provider(mut self, provider: Arc<dyn TableProvider>) -> ContainerOptions {
		self.provider = Some(provider);
		self
	}

	pub fn converter(mut self, converter: Arc<dyn ValueConverter>) -> ContainerOptions {
		self.converter = converter;
		self
	}

	pub fn backing(mut self, backing: Arc<dyn BackingConnection>) -> ContainerOptions {
		self.backing = Some(backing);
		self
	}

	pub fn build(self) -> tandem_core::Result<DatabaseContainer> {
		let provider = self.provider.ok_or_else(|| Error::Configuration {
			detail: "a table provider is required".to_string(),
		})?;
		if self.mode.is_accelerator() && self.backing.is_none() {
			return Err(Error::Configuration {
				detail: "accelerator mode requires a backing connection".to_string(),
			});
		}
		if !self.mode.is_accelerator() && self.backing.is_some() {
			return Err(Error::Configuration {
				detail: "emulator mode does not take a backing connection"
					.to_string(),
			});
		}
		Ok(DatabaseContainer {
			mode: self.mode,
			provider,
			converter: self.converter,
			backing: self.backing,
			cache: PlanCache::new(),
			backing_ready: OnceCell::new(),
		})
	}
}

/// Execution surface of one in-memory database: compiles statements,
/// memoizes their plans and executes queries and modifications.
/// Statements run synchronously on the calling thread; the container
/// is shared between execution contexts behind `Arc`.
pub struct DatabaseContainer {
	mode: ProviderMode,
	provider: Arc<dyn TableProvider>,
	converter: Arc<dyn ValueConverter>,
	backing: Option<Arc<dyn BackingConnection>>,
	cache: PlanCache,
	backing_ready: OnceCell<()>,
}

impl DatabaseContainer {
	pub fn mode(&self) -> ProviderMode {
		self.mode
	}

	/// Returns the memoized plan for the statement text, compiling and
	/// storing it on the first encounter. Plans are fully built before
	/// they become visible to other threads.
	pub fn compile_and_cache(
		&self,
		text: &str,
		tree: &CommandTree,
	) -> tandem_core::Result<Arc<CompiledPlan>> {
		if let Some(plan) = self.cache.lookup(text) {
			return Ok(plan);
		}
		let started = Instant::now();
		let plan = Arc::new(compile(tree, self.provider.as_ref())?);
		debug!(statement = text, duration = ?started.elapsed(), "compiled statement plan");
		self.cache.store(text, Arc::clone(&plan));
		Ok(plan)
	}

	pub fn execute_query(
		&self,
		plan: &CompiledPlan,
		params: &Params,
	) -> tandem_core::Result<RowStream> {
		query::execute(plan, params, self.converter.as_ref())
	}

	pub fn execute_insert(
		&self,
		statement: &Statement,
		params: &Params,
	) -> tandem_core::Result<(usize, Vec<ReturningRow>)> {
		let plan = self.compile_and_cache(&statement.text, &statement.tree)?;
		let ctx = self.mutation_context()?;
		mutate::insert::execute(&ctx, &plan, &statement.tree, &statement.text, params)
	}

	pub fn execute_update(
		&self,
		statement: &Statement,
		params: &Params,
	) -> tandem_core::Result<(usize, Vec<ReturningRow>)> {
		let plan = self.compile_and_cache(&statement.text, &statement.tree)?;
		let ctx = self.mutation_context()?;
		mutate::update::execute(&ctx, &plan, &statement.tree, &statement.text, params)
	}

	pub fn execute_delete(
		&self,
		statement: &Statement,
		params: &Params,
	) -> tandem_core::Result<(usize, Vec<ReturningRow>)> {
		let plan = self.compile_and_cache(&statement.text, &statement.tree)?;
		let ctx = self.mutation_context()?;
		mutate::delete::execute(&ctx, &plan, &statement.tree, &statement.text, params)
	}

	fn mutation_context(&self) -> tandem_core::Result<MutationContext<'_>> {
		let backing = match &self.backing {
			Some(backing) => {
				// opened once, before the first accelerator use
				self.backing_ready.get_or_try_init(|| backing.ensure_open())?;
				Some(backing.as_ref())
			}
			None => None,
		};
		Ok(MutationContext {
			provider: self.provider.as_ref(),
			converter: self.converter.as_ref(),
			backing,
		})
	}
}
