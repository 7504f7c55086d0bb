//! Specification records and meta-schema validation.
//!
//! A spec directory holds a reserved `spec.yaml` manifest with ordered
//! `routes:` and `models:` record lists. Records are validated one at a time
//! so a malformed record is logged and skipped while the rest of the batch
//! continues. Unrecognized keys are retained and passed through to templates
//! untouched (allow-unknown mode).

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{Error, Result};

/// Reserved manifest filename, excluded from artifact scanning
pub const SPEC_MANIFEST: &str = "spec.yaml";

/// Default MIME content type for route responses
pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Content type forced by the render hook unless the record overrides it
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-z-]+$").expect("valid name pattern"));

/// HTTP verb of a route record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Delete => "delete",
            Method::Patch => "patch",
        }
    }

    /// All supported verbs, used when registering verb-independent templates
    pub fn all() -> [Method; 5] {
        [
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Delete,
            Method::Patch,
        ]
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "delete" => Ok(Method::Delete),
            "patch" => Ok(Method::Patch),
            other => Err(Error::spec_invalid(
                other,
                format!("unsupported HTTP method '{other}'"),
            )),
        }
    }
}

/// Service-layer symbols a route stub should import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceImport {
    /// Module path handed to `require()` in the generated stub
    pub module: String,
    /// Named symbols bound from the module
    pub symbols: Vec<String>,
}

/// Page-generation reference for the render hook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderHook {
    /// View name passed to the server renderer
    pub view: String,
}

/// One declarative route/client-binding record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Kebab-case identifier, unique within a run
    pub name: String,
    pub method: Method,
    /// Path template with `:param` placeholders
    pub uri: String,
    /// Response content type; resolved through [`RouteSpec::content_type`]
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "enableJWT", default)]
    pub enable_jwt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceImport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderHook>,
    /// Textual field-constraint expression, e.g. `{id: required number}`
    pub schema: String,
    /// Unrecognized keys, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl RouteSpec {
    /// Resolved content type: explicit value, else the HTML default in
    /// page-generation mode, else the JSON default.
    pub fn content_type(&self) -> &str {
        match &self.content_type {
            Some(explicit) => explicit,
            None if self.render.is_some() => HTML_CONTENT_TYPE,
            None => DEFAULT_CONTENT_TYPE,
        }
    }

    /// Check constraints the type system cannot express
    pub fn validate(&self) -> Result<()> {
        if !NAME_PATTERN.is_match(&self.name) {
            return Err(Error::spec_invalid(
                &self.name,
                format!("name '{}' must match ^[a-z-]+$", self.name),
            ));
        }
        if self.uri.is_empty() {
            return Err(Error::spec_invalid(&self.name, "uri must not be empty"));
        }
        Ok(())
    }
}

/// One declarative data-model record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Kebab-case model identity
    pub identify: String,
    pub connection: String,
    #[serde(rename = "shardKey")]
    pub shard_key: String,
    /// Free-form attribute mapping, serialized verbatim into the stub
    pub attributes: serde_yaml::Value,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl ModelSpec {
    pub fn validate(&self) -> Result<()> {
        if !NAME_PATTERN.is_match(&self.identify) {
            return Err(Error::spec_invalid(
                &self.identify,
                format!("identify '{}' must match ^[a-z-]+$", self.identify),
            ));
        }
        if !self.attributes.is_mapping() {
            return Err(Error::spec_invalid(
                &self.identify,
                "attributes must be a mapping",
            ));
        }
        Ok(())
    }

    /// Model description embedded into the stub: the record minus its shard
    /// key, with `identify` surfaced as the model `identity`.
    pub fn schema_json(&self) -> Result<String> {
        #[derive(Serialize)]
        struct ModelSchema<'a> {
            identity: &'a str,
            connection: &'a str,
            attributes: &'a serde_yaml::Value,
        }

        Ok(serde_json::to_string(&ModelSchema {
            identity: &self.identify,
            connection: &self.connection,
            attributes: &self.attributes,
        })?)
    }
}

/// Raw manifest as parsed from `spec.yaml`; records stay untyped until
/// per-record validation so one bad record cannot fail the whole parse.
#[derive(Debug, Default, Deserialize)]
pub struct RawManifest {
    #[serde(default)]
    pub routes: Vec<serde_yaml::Value>,
    #[serde(default)]
    pub models: Vec<serde_yaml::Value>,
}

/// Load the reserved `spec.yaml` manifest from a spec directory.
///
/// Manifest-level failures (missing file, invalid YAML) abort the run.
pub async fn load_manifest(dir: &Path) -> Result<RawManifest> {
    let path = dir.join(SPEC_MANIFEST);
    let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
        Error::path_invalid(format!(
            "cannot read spec manifest '{}': {e}",
            path.display()
        ))
    })?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Best-effort record name for log messages before validation has run
fn raw_name(value: &serde_yaml::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("<unnamed>")
        .to_string()
}

fn selected(name: &str, only: &[String]) -> bool {
    only.is_empty() || only.iter().any(|n| n == name)
}

/// Validate and default the route records of a manifest.
///
/// Records failing validation are logged with their name and skipped; the
/// rest of the batch continues. An optional name filter restricts the result
/// to a subset (empty filter selects all records). Duplicate names after the
/// first are rejected.
pub fn validated_routes(manifest: &RawManifest, only: &[String]) -> Vec<RouteSpec> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for raw in &manifest.routes {
        let name = raw_name(raw, "name");
        if !selected(&name, only) {
            continue;
        }

        let route: RouteSpec = match serde_yaml::from_value(raw.clone()) {
            Ok(route) => route,
            Err(e) => {
                warn!(record = %name, error = %e, "skipping invalid route record");
                continue;
            }
        };
        if let Err(e) = route.validate() {
            warn!(record = %route.name, error = %e, "skipping invalid route record");
            continue;
        }
        if !seen.insert(route.name.clone()) {
            warn!(record = %route.name, "skipping duplicate route record");
            continue;
        }
        out.push(route);
    }

    out
}

/// Validate the model records of a manifest, with the same skip-and-continue
/// policy as [`validated_routes`].
pub fn validated_models(manifest: &RawManifest, only: &[String]) -> Vec<ModelSpec> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for raw in &manifest.models {
        let name = raw_name(raw, "identify");
        if !selected(&name, only) {
            continue;
        }

        let model: ModelSpec = match serde_yaml::from_value(raw.clone()) {
            Ok(model) => model,
            Err(e) => {
                warn!(record = %name, error = %e, "skipping invalid model record");
                continue;
            }
        };
        if let Err(e) = model.validate() {
            warn!(record = %model.identify, error = %e, "skipping invalid model record");
            continue;
        }
        if !seen.insert(model.identify.clone()) {
            warn!(record = %model.identify, "skipping duplicate model record");
            continue;
        }
        out.push(model);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(yaml: &str) -> RawManifest {
        serde_yaml::from_str(yaml).unwrap()
    }

    const BASIC: &str = r#"
routes:
  - name: user-fetch-single
    method: get
    uri: /user/:id
    schema: "{id: required number}"
"#;

    #[test]
    fn test_route_defaults() {
        let routes = validated_routes(&manifest(BASIC), &[]);
        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.name, "user-fetch-single");
        assert_eq!(route.method, Method::Get);
        assert_eq!(route.content_type(), DEFAULT_CONTENT_TYPE);
        assert!(!route.enable_jwt);
        assert!(route.service.is_none());
    }

    #[test]
    fn test_render_hook_forces_html_default() {
        let routes = validated_routes(
            &manifest(
                r#"
routes:
  - name: home-page
    method: get
    uri: /
    schema: "{}"
    render:
      view: home
  - name: typed-page
    method: get
    uri: /typed
    schema: "{}"
    type: application/xhtml+xml
    render:
      view: typed
"#,
            ),
            &[],
        );
        assert_eq!(routes[0].content_type(), HTML_CONTENT_TYPE);
        assert_eq!(routes[1].content_type(), "application/xhtml+xml");
    }

    #[test]
    fn test_invalid_record_is_skipped_not_fatal() {
        let routes = validated_routes(
            &manifest(
                r#"
routes:
  - name: Bad_Name
    method: get
    uri: /bad
    schema: "{}"
  - name: user-fetch
    method: head
    uri: /user
    schema: "{}"
  - name: user-fetch
    method: get
    uri: /user
    schema: "{}"
"#,
            ),
            &[],
        );
        // bad name pattern and bad method both skipped
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].name, "user-fetch");
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let routes = validated_routes(
            &manifest(
                r#"
routes:
  - name: user-fetch
    method: get
    uri: /first
    schema: "{}"
  - name: user-fetch
    method: post
    uri: /second
    schema: "{}"
"#,
            ),
            &[],
        );
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].uri, "/first");
    }

    #[test]
    fn test_name_filter() {
        let yaml = r#"
routes:
  - name: user-fetch
    method: get
    uri: /user
    schema: "{}"
  - name: user-create
    method: post
    uri: /user
    schema: "{}"
"#;
        let all = validated_routes(&manifest(yaml), &[]);
        assert_eq!(all.len(), 2);

        let only = validated_routes(&manifest(yaml), &["user-create".to_string()]);
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].name, "user-create");
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let routes = validated_routes(
            &manifest(
                r#"
routes:
  - name: user-fetch
    method: get
    uri: /user
    schema: "{}"
    owner: platform-team
"#,
            ),
            &[],
        );
        assert_eq!(
            routes[0].extra.get("owner").and_then(|v| v.as_str()),
            Some("platform-team")
        );
    }

    #[test]
    fn test_model_schema_json_drops_shard_key() {
        let models = validated_models(
            &manifest(
                r#"
models:
  - identify: user
    connection: default
    shardKey: id
    attributes:
      id:
        type: integer
        primaryKey: true
      firstName: string
"#,
            ),
            &[],
        );
        assert_eq!(models.len(), 1);
        let json = models[0].schema_json().unwrap();
        assert!(json.contains("\"identity\":\"user\""));
        assert!(json.contains("\"firstName\":\"string\""));
        assert!(!json.contains("shardKey"));
    }

    #[test]
    fn test_model_missing_key_is_skipped() {
        let models = validated_models(
            &manifest(
                r#"
models:
  - identify: user
    connection: default
    attributes: {}
"#,
            ),
            &[],
        );
        assert!(models.is_empty());
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!(Method::from_str("get").unwrap(), Method::Get);
        assert_eq!(Method::from_str("PATCH").unwrap(), Method::Patch);
        assert!(Method::from_str("head").is_err());
    }
}
