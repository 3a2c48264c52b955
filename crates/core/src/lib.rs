// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

pub use error::Error;
pub use row::{Entity, FieldDef, ReturningRow, TableSchema};

pub mod interface;

mod error;
mod row;

pub type Result<T> = std::result::Result<T, Error>;
