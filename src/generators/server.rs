//! Consolidated server-side proxy SDK generation.
//!
//! The proxy transport dispatches to the generated route stubs by require
//! path instead of speaking HTTP, so it needs the application root path to
//! anchor those paths.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::aggregate;
use crate::core::error::Result;
use crate::core::options::SdkOptions;
use crate::core::schema::classify_with_fallback;
use crate::core::spec;
use crate::core::templates::embedded::{PROXY_SDK_HEAD, PROXY_SDK_TAIL};
use crate::core::templates::{ArtifactKind, TemplateRegistry, synthesize_sdk_fn};
use crate::core::writer;
use crate::generators::ensure_abs_dir;

/// Fixed name of the aggregated proxy-transport SDK module
pub const SERVER_SDK_FILENAME: &str = "apiforge-server.js";

/// Generate the consolidated server-side SDK module into `out_dir`
pub async fn generate_server_sdk(
    spec_dir: &Path,
    out_dir: &Path,
    options: &SdkOptions,
    only: &[String],
) -> Result<PathBuf> {
    ensure_abs_dir(spec_dir, "spec directory")?;
    ensure_abs_dir(out_dir, "output directory")?;
    options.validate_proxy()?;
    info!(path = %spec_dir.display(), "generating server SDK");

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
                    ArtifactKind::ProxySdkFn,
                    route,
                    &params,
                    options,
                )
            };
            (route.name.clone(), fragment)
        })
        .collect();

    let rendered = aggregate::collect_ordered(fragments).await;
    let module = aggregate::assemble(PROXY_SDK_HEAD, &rendered, PROXY_SDK_TAIL);

    let target = out_dir.join(SERVER_SDK_FILENAME);
    writer::write_whole(&target, &module).await?;
    info!(path = %target.display(), fragments = rendered.len(), "wrote server SDK");
    Ok(target)
}
