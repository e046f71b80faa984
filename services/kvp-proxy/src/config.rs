//! Startup configuration.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use url::Url;

/// Immutable proxy configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Backend that receives the rewritten RESTful requests.
    pub target: Url,

    /// Capabilities template; when unset GetCapabilities is proxied.
    pub template: Option<PathBuf>,

    /// Log every request/response pair.
    pub logging: bool,
}

impl ProxyConfig {
    /// Validate the target host and build the configuration.
    pub fn new(host: &str, template: Option<PathBuf>, logging: bool) -> Result<Self> {
        if host.trim().is_empty() {
            bail!("No target host is configured");
        }

        let target =
            Url::parse(host).with_context(|| format!("Invalid target host: {}", host))?;

        if !matches!(target.scheme(), "http" | "https") {
            bail!("Target host must use http or https, got: {}", target.scheme());
        }
        if target.host_str().is_none() {
            bail!("Target host has no host name: {}", host);
        }

        if let Some(path) = &template {
            if !path.is_file() {
                bail!("Capabilities template not found: {}", path.display());
            }
        }

        Ok(Self {
            target,
            template,
            logging,
        })
    }
}
