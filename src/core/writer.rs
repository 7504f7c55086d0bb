//! Sentinel-guarded artifact writing.
//!
//! Regeneration must never silently clobber developer-modified code. Once a
//! developer inserts the `noCompile` sentinel anywhere in a generated file,
//! ownership transfers to them and the file is skipped on every later run.
//! Protection is opt-out via the sentinel, not opt-in.
//!
//! The read-sentinel-then-write sequence is not atomic across processes;
//! concurrent runs against one output directory must be serialized by the
//! caller.

use std::io;
use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::core::error::{Error, Result};

/// Literal token marking a generated file as manually maintained.
///
/// Matched as a bare per-line substring. That can false-positive on
/// incidental text; this is a documented heuristic, kept as-is.
pub const SENTINEL: &str = "noCompile";

/// Outcome of a guarded write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Content was written (file was absent or unprotected)
    Written,
    /// Existing file carries the sentinel; left byte-identical
    SkippedSentinel,
}

fn contains_sentinel(contents: &str) -> bool {
    contents.lines().any(|line| line.contains(SENTINEL))
}

async fn write_all(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).await.map_err(|source| Error::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `content` to `path` unless the existing file is sentinel-locked.
///
/// Absent file: write. Present with the sentinel on any line: skip silently
/// and succeed. Present without it: overwrite unconditionally. Writes are
/// whole-content, never incremental, so a failure cannot leave a partial
/// artifact behind.
pub async fn write_guarded(path: &Path, content: &str) -> Result<WriteOutcome> {
    match fs::read_to_string(path).await {
        Ok(existing) => {
            if contains_sentinel(&existing) {
                debug!(path = %path.display(), "sentinel present, preserving manual edits");
                return Ok(WriteOutcome::SkippedSentinel);
            }
            write_all(path, content).await?;
            Ok(WriteOutcome::Written)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            write_all(path, content).await?;
            Ok(WriteOutcome::Written)
        }
        Err(source) => Err(Error::WriteFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Unconditional whole-content write, used for aggregated SDK modules
pub async fn write_whole(path: &Path, content: &str) -> Result<()> {
    write_all(path, content).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_absent_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("get-user.js");

        let outcome = write_guarded(&target, "generated").await.unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "generated");
    }

    #[tokio::test]
    async fn test_overwrites_unprotected_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("get-user.js");
        std::fs::write(&target, "stale output").unwrap();

        let outcome = write_guarded(&target, "fresh output").await.unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "fresh output");
    }

    #[tokio::test]
    async fn test_sentinel_file_left_byte_identical() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("get-user.js");
        let edited = "// noCompile\nfunction custom() { return 42; }\n";
        std::fs::write(&target, edited).unwrap();

        let outcome = write_guarded(&target, "regenerated").await.unwrap();
        assert_eq!(outcome, WriteOutcome::SkippedSentinel);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), edited);
    }

    #[tokio::test]
    async fn test_sentinel_matches_anywhere_in_line() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("get-user.js");
        // incidental mention still locks the file; documented heuristic
        std::fs::write(&target, "var x = 1; /* please noCompile this */").unwrap();

        let outcome = write_guarded(&target, "regenerated").await.unwrap();
        assert_eq!(outcome, WriteOutcome::SkippedSentinel);
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_path() {
        let dir = TempDir::new().unwrap();
        // target's parent does not exist
        let target = dir.path().join("missing").join("get-user.js");

        let err = write_guarded(&target, "content").await.unwrap_err();
        match err {
            Error::WriteFailed { path, .. } => assert_eq!(path, target),
            other => panic!("expected WriteFailed, got {other:?}"),
        }
    }
}
