//! Route stub generation: one guarded `<method>-<name>.js` per record.

use std::path::Path;

use tracing::{info, warn};

use crate::core::error::Result;
use crate::core::spec::{self, RouteSpec};
use crate::core::templates::{TemplateRegistry, synthesize_route};
use crate::core::writer::{self, WriteOutcome};
use crate::generators::{GenerationSummary, ensure_abs_dir};

/// Target filename of a route stub
pub fn route_stub_filename(route: &RouteSpec) -> String {
    format!("{}-{}.js", route.method, route.name)
}

/// Generate route stubs for every selected record in the spec directory.
///
/// Stubs are written next to the manifest; sentinel-locked files are left
/// untouched. A failing record is logged and counted, never fatal.
pub async fn generate_routes(spec_dir: &Path, only: &[String]) -> Result<GenerationSummary> {
    ensure_abs_dir(spec_dir, "spec directory")?;
    info!(path = %spec_dir.display(), "generating route stubs");

    let manifest = spec::load_manifest(spec_dir).await?;
    let routes = spec::validated_routes(&manifest, only);
    let registry = TemplateRegistry::new()?;

    let mut summary = GenerationSummary::default();
    for route in &routes {
        let target = spec_dir.join(route_stub_filename(route));
        let outcome = match synthesize_route(&registry, route) {
            Ok(content) => writer::write_guarded(&target, &content).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(WriteOutcome::Written) => {
                info!(record = %route.name, path = %target.display(), "wrote route stub");
                summary.written += 1;
            }
            Ok(WriteOutcome::SkippedSentinel) => {
                info!(record = %route.name, "sentinel present, stub preserved");
                summary.skipped += 1;
            }
            Err(e) => {
                warn!(record = %route.name, error = %e, "route stub generation failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        written = summary.written,
        skipped = summary.skipped,
        failed = summary.failed,
        "route stub generation finished"
    );
    Ok(summary)
}
