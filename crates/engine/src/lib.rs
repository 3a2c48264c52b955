// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

pub use container::{ContainerOptions, DatabaseContainer, Statement};
pub use convert::StandardConverter;
pub use evaluate::{Datum, EvalContext};
pub use execute::query::RowStream;
pub use tandem_core::{Error, Result};

mod container;
mod convert;
mod evaluate;
mod execute;
