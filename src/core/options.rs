//! Runner options for consolidated SDK generation.

use serde::Serialize;

use crate::core::error::{Error, Result};

/// Default request timeout for generated client functions, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default API version segment of the client base URL
pub const DEFAULT_API_VERSION: &str = "1.0";

/// Options controlling SDK module generation.
///
/// `host`/`protocol`/`api_version` shape the client base URL
/// (`protocol://host/api/apiVersion`); `root_path` anchors the require paths
/// of the server-side proxy transport.
#[derive(Debug, Clone, Serialize)]
pub struct SdkOptions {
    pub host: Option<String>,
    pub protocol: String,
    pub api_version: String,
    pub timeout_ms: u64,
    pub root_path: Option<String>,
}

impl Default for SdkOptions {
    fn default() -> Self {
        Self {
            host: None,
            protocol: "http".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            root_path: None,
        }
    }
}

impl SdkOptions {
    fn validate_protocol(&self) -> Result<()> {
        match self.protocol.as_str() {
            "http" | "https" => Ok(()),
            other => Err(Error::options(format!(
                "protocol must be 'http' or 'https', got '{other}'"
            ))),
        }
    }

    /// Validate options for browser-transport SDK generation
    pub fn validate_browser(&self) -> Result<()> {
        self.validate_protocol()?;
        if self.host.as_deref().unwrap_or("").is_empty() {
            return Err(Error::options("host is required for client SDK generation"));
        }
        Ok(())
    }

    /// Validate options for server-side proxy SDK generation
    pub fn validate_proxy(&self) -> Result<()> {
        match self.root_path.as_deref() {
            None | Some("") => Err(Error::options(
                "root-path is required for server SDK generation",
            )),
            Some(root) if !root.starts_with('/') => Err(Error::options(format!(
                "root-path must be absolute, got '{root}'"
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Client base URL: `protocol://host/api/apiVersion`
    pub fn base_url(&self) -> Result<String> {
        self.validate_browser()?;
        let host = self.host.as_deref().unwrap_or_default();
        Ok(format!(
            "{}://{}/api/{}",
            self.protocol, host, self.api_version
        ))
    }
}
