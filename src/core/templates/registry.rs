//! Static template registry keyed by (artifact kind, HTTP verb).
//!
//! The registry is an explicit per-run value with no process-wide state. A
//! missing (kind, verb) entry is documented partial coverage, not an error;
//! the synthesizer resolves it to an intentionally empty stub.

use std::collections::HashMap;

use serde::Serialize;
use tera::Tera;

use crate::core::error::Result;
use crate::core::spec::Method;
use crate::core::templates::embedded;

/// Kind of generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Per-route server handler stub
    RouteStub,
    /// Data-model stub bound to the ORM layer
    ModelStub,
    /// Client SDK function, browser transport
    BrowserSdkFn,
    /// Client SDK function, server-side proxy transport
    ProxySdkFn,
}

pub(crate) const ROUTE_STUB_TPL: &str = "route_stub.js.tera";
pub(crate) const MODEL_STUB_TPL: &str = "model_stub.js.tera";
pub(crate) const SDK_BROWSER_GET_TPL: &str = "sdk_browser_get.js.tera";
pub(crate) const SDK_PROXY_GET_TPL: &str = "sdk_proxy_get.js.tera";
pub(crate) const SDK_NOOP_TPL: &str = "sdk_noop.js.tera";

/// Per-run template registry: an embedded Tera instance plus the
/// (kind, verb) dispatch table
pub struct TemplateRegistry {
    tera: Tera,
    table: HashMap<(ArtifactKind, Method), &'static str>,
}

impl TemplateRegistry {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(ROUTE_STUB_TPL, embedded::ROUTE_STUB)?;
        tera.add_raw_template(MODEL_STUB_TPL, embedded::MODEL_STUB)?;
        tera.add_raw_template(SDK_BROWSER_GET_TPL, embedded::SDK_BROWSER_GET)?;
        tera.add_raw_template(SDK_PROXY_GET_TPL, embedded::SDK_PROXY_GET)?;
        tera.add_raw_template(SDK_NOOP_TPL, embedded::SDK_NOOP)?;

        let mut table: HashMap<(ArtifactKind, Method), &'static str> = HashMap::new();
        for method in Method::all() {
            // route and model stubs are verb-independent
            table.insert((ArtifactKind::RouteStub, method), ROUTE_STUB_TPL);
            table.insert((ArtifactKind::ModelStub, method), MODEL_STUB_TPL);
        }
        table.insert((ArtifactKind::BrowserSdkFn, Method::Get), SDK_BROWSER_GET_TPL);
        table.insert((ArtifactKind::ProxySdkFn, Method::Get), SDK_PROXY_GET_TPL);
        // non-GET proxy functions keep their signatures but have no body yet
        for method in [Method::Post, Method::Put, Method::Delete, Method::Patch] {
            table.insert((ArtifactKind::ProxySdkFn, method), SDK_NOOP_TPL);
        }

        Ok(Self { tera, table })
    }

    /// Resolve the template for an artifact kind and verb, if one is registered
    pub fn lookup(&self, kind: ArtifactKind, method: Method) -> Option<&'static str> {
        self.table.get(&(kind, method)).copied()
    }

    /// Render a registered template with the given context
    pub fn render<C: Serialize>(&self, template: &str, context: &C) -> Result<String> {
        let tera_context = tera::Context::from_serialize(context)?;
        Ok(self.tera.render(template, &tera_context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_stub_registered_for_all_verbs() {
        let registry = TemplateRegistry::new().unwrap();
        for method in Method::all() {
            assert_eq!(
                registry.lookup(ArtifactKind::RouteStub, method),
                Some(ROUTE_STUB_TPL)
            );
        }
    }

    #[test]
    fn test_browser_sdk_only_covers_get() {
        let registry = TemplateRegistry::new().unwrap();
        assert_eq!(
            registry.lookup(ArtifactKind::BrowserSdkFn, Method::Get),
            Some(SDK_BROWSER_GET_TPL)
        );
        assert_eq!(registry.lookup(ArtifactKind::BrowserSdkFn, Method::Put), None);
        assert_eq!(registry.lookup(ArtifactKind::BrowserSdkFn, Method::Post), None);
    }

    #[test]
    fn test_proxy_sdk_non_get_maps_to_noop() {
        let registry = TemplateRegistry::new().unwrap();
        assert_eq!(
            registry.lookup(ArtifactKind::ProxySdkFn, Method::Get),
            Some(SDK_PROXY_GET_TPL)
        );
        assert_eq!(
            registry.lookup(ArtifactKind::ProxySdkFn, Method::Delete),
            Some(SDK_NOOP_TPL)
        );
    }
}
