//! Application state and shared resources.

use std::sync::Arc;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::capabilities::{CapabilitiesTemplate, TemplateRenderer};
use crate::config::ProxyConfig;
use crate::forward::{Forwarder, HttpForwarder};

/// Shared application state, immutable after startup.
pub struct AppState {
    pub config: ProxyConfig,
    pub forwarder: Arc<dyn Forwarder>,
    /// Set when GetCapabilities is answered from a local template.
    pub renderer: Option<Arc<dyn TemplateRenderer>>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the HTTP forwarder and, if configured, load the capabilities template.
    pub fn new(config: ProxyConfig, metrics: Option<PrometheusHandle>) -> Result<Self> {
        let forwarder = HttpForwarder::new(config.target.clone())
            .context("Failed to build upstream HTTP client")?;

        let renderer = match &config.template {
            Some(path) => {
                let template = CapabilitiesTemplate::load(path)?;
                Some(Arc::new(template) as Arc<dyn TemplateRenderer>)
            }
            None => None,
        };

        Ok(Self {
            config,
            forwarder: Arc::new(forwarder),
            renderer,
            metrics,
        })
    }

    /// Assemble state from already-built parts.
    pub fn with_parts(
        config: ProxyConfig,
        forwarder: Arc<dyn Forwarder>,
        renderer: Option<Arc<dyn TemplateRenderer>>,
    ) -> Self {
        Self {
            config,
            forwarder,
            renderer,
            metrics: None,
        }
    }
}
