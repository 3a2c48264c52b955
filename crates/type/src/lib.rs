// Copyright (c) tandemdb.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

pub use params::Params;
pub use value::{IntoValue, Type, Value};

mod params;
mod value;
