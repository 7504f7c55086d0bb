//! Core generation pipeline: spec records, schema classification, template
//! synthesis, and guarded artifact writing.

pub mod aggregate;
pub mod error;
pub mod naming;
pub mod options;
pub mod schema;
pub mod spec;
pub mod templates;
pub mod writer;

pub use error::{Error, Result};
