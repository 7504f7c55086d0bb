//! apiforge generates the boilerplate surface of an HTTP API from declarative
//! specification records: per-route handler stubs, data-model stubs, and
//! consolidated client/server SDK modules.
//!
//! A specification directory holds a reserved `spec.yaml` manifest describing
//! routes and models. Each record is validated, its field schema is classified
//! into required/optional parameters, and the matching artifact template is
//! rendered and written next to the manifest. Generated files that a developer
//! has marked with the `noCompile` sentinel are never overwritten.

pub mod core;
pub mod generators;

pub use crate::core::error::{Error, Result};
