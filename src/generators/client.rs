//! Consolidated browser-transport SDK generation.
//!
//! Every route record becomes one client function fragment; fragments render
//! independently (fan-out), then fan-in restores specification order before
//! a single whole-module write.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::aggregate;
use crate::core::error::Result;
use crate::core::options::SdkOptions;
use crate::core::schema::classify_with_fallback;
use crate::core::spec;
use crate::core::templates::embedded::{CLIENT_SDK_HEAD, CLIENT_SDK_TAIL};
use crate::core::templates::{ArtifactKind, TemplateRegistry, synthesize_sdk_fn};
use crate::core::writer;
use crate::generators::ensure_abs_dir;

/// Fixed name of the aggregated browser-transport SDK module
pub const CLIENT_SDK_FILENAME: &str = "apiforge-client.js";

/// Generate the consolidated client SDK module into `out_dir`
pub async fn generate_client_sdk(
    spec_dir: &Path,
    out_dir: &Path,
    options: &SdkOptions,
    only: &[String],
) -> Result<PathBuf> {
    ensure_abs_dir(spec_dir, "spec directory")?;
    ensure_abs_dir(out_dir, "output directory")?;
    options.validate_browser()?;
    info!(path = %spec_dir.display(), "generating client SDK");

    let manifest = spec::load_manifest(spec_dir).await?;
    let routes = spec::validated_routes(&manifest, only);
    let registry = TemplateRegistry::new()?;

    let registry_ref = &registry;
    let fragments = routes
        .iter()
        .map(|route| {
            let (_, params) = classify_with_fallback(&route.name, &route.schema);
            let fragment = async move {
                synthesize_sdk_fn(
                    registry_ref,
                    ArtifactKind::BrowserSdkFn,
                    route,
                    &params,
                    options,
                )
            };
            (route.name.clone(), fragment)
        })
        .collect();

    let rendered = aggregate::collect_ordered(fragments).await;
    let module = aggregate::assemble(CLIENT_SDK_HEAD, &rendered, CLIENT_SDK_TAIL);

    let target = out_dir.join(CLIENT_SDK_FILENAME);
    writer::write_whole(&target, &module).await?;
    info!(path = %target.display(), fragments = rendered.len(), "wrote client SDK");
    Ok(target)
}
