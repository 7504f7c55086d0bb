//! Error handling for the apiforge generation library.
//!
//! This module defines the main error type `Error` used throughout the
//! library, along with a convenient `Result` type alias. Per-record failures
//! (`SpecInvalid`, `SchemaEval`) are logged and skipped by the generators so
//! one bad record never aborts a batch; directory-level failures
//! (`PathInvalid`) abort a run before any record is processed.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for apiforge generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for apiforge generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// A specification record failed meta-schema validation
    #[error("invalid spec record '{name}': {reason}")]
    SpecInvalid { name: String, reason: String },

    /// A record's field schema expression failed to parse or had the wrong shape
    #[error("schema expression of '{name}' failed to evaluate: {reason}")]
    SchemaEval { name: String, reason: String },

    /// Input or output directory is missing, not a directory, or not absolute
    #[error("path error: {0}")]
    PathInvalid(String),

    /// Writing a generated artifact failed
    #[error("failed to write artifact '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// SDK generation options failed validation
    #[error("invalid generation options: {0}")]
    Options(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template engine error
    #[error("template engine error: {0}")]
    Template(#[from] tera::Error),
}

impl Error {
    /// Create a new `SpecInvalid` error for the named record
    pub fn spec_invalid<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Self::SpecInvalid {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new `SchemaEval` error for the named record
    pub fn schema_eval<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Self::SchemaEval {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new `PathInvalid` error
    pub fn path_invalid<S: Into<String>>(msg: S) -> Self {
        Self::PathInvalid(msg.into())
    }

    /// Create a new options validation error
    pub fn options<S: Into<String>>(msg: S) -> Self {
        Self::Options(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_spec_invalid_display() {
        let error = Error::spec_invalid("user-fetch", "missing required key 'uri'");
        assert!(matches!(error, Error::SpecInvalid { .. }));
        assert_eq!(
            error.to_string(),
            "invalid spec record 'user-fetch': missing required key 'uri'"
        );
    }

    #[test]
    fn test_schema_eval_display() {
        let error = Error::schema_eval("user-fetch", "expected '{'");
        assert_eq!(
            error.to_string(),
            "schema expression of 'user-fetch' failed to evaluate: expected '{'"
        );
    }

    #[test]
    fn test_path_invalid_display() {
        let error = Error::path_invalid("spec dir must be absolute: foo/bar");
        assert!(matches!(error, Error::PathInvalid(_)));
        assert!(error.to_string().contains("must be absolute"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_write_failed_carries_path() {
        let error = Error::WriteFailed {
            path: PathBuf::from("/out/get-user.js"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("/out/get-user.js"));
        assert!(error.to_string().contains("denied"));
    }
}
