//! Order-preserving aggregation of rendered fragments.
//!
//! Consolidated SDK modules are assembled from a fixed head block (shared
//! runtime helpers), one fragment per specification record, and a fixed tail
//! block (module export boilerplate). Fragments render independently and may
//! fan out concurrently; the fan-in restores original specification order
//! regardless of completion order.

use futures::future::join_all;
use std::future::Future;
use tracing::warn;

use crate::core::error::Result;

/// Await all fragment renders, preserving input order in the result.
///
/// Each entry pairs a record name with its render future. A failed render is
/// logged with the record's name and dropped; the remaining fragments keep
/// their relative order (per-record failure isolation).
pub async fn collect_ordered<F>(fragments: Vec<(String, F)>) -> Vec<String>
where
    F: Future<Output = Result<String>>,
{
    let (names, futures): (Vec<_>, Vec<_>) = fragments.into_iter().unzip();
    let rendered = join_all(futures).await;

    names
        .into_iter()
        .zip(rendered)
        .filter_map(|(name, result)| match result {
            Ok(fragment) => Some(fragment),
            Err(e) => {
                warn!(record = %name, error = %e, "skipping failed fragment render");
                None
            }
        })
        .collect()
}

/// Concatenate head, fragments (in order), and tail into one artifact
pub fn assemble(head: &str, fragments: &[String], tail: &str) -> String {
    let mut output = String::with_capacity(
        head.len() + fragments.iter().map(String::len).sum::<usize>() + tail.len(),
    );
    output.push_str(head);
    for fragment in fragments {
        output.push_str(fragment);
    }
    output.push_str(tail);
    output
}
