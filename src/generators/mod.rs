//! Generation pipelines: one driver per artifact family.
//!
//! Each driver checks its directory preconditions up front (a bad path aborts
//! the run before any record is processed), then walks the validated records
//! with per-record failure isolation.

pub mod client;
pub mod models;
pub mod routes;
pub mod server;

use std::path::Path;

use crate::core::error::{Error, Result};

/// Counts of per-record outcomes for one generation run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Artifacts written (new or overwritten)
    pub written: usize,
    /// Artifacts left untouched because of the sentinel
    pub skipped: usize,
    /// Records that failed during synthesis or writing
    pub failed: usize,
}

/// Directory precondition shared by every driver: must exist, be a
/// directory, and be absolute.
pub(crate) fn ensure_abs_dir(path: &Path, label: &str) -> Result<()> {
    if !path.is_absolute() {
        return Err(Error::path_invalid(format!(
            "{label} must be an absolute path: {}",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(Error::path_invalid(format!(
            "{label} must be an existing directory: {}",
            path.display()
        )));
    }
    Ok(())
}
