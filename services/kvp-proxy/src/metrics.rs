//! Request and exception counters exported in Prometheus format.

use anyhow::{Context, Result};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use wmts_common::WmtsError;
use wmts_protocol::Operation;

/// Install the global Prometheus recorder.
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// Count a translated KVP request.
pub fn record_operation(operation: Operation) {
    counter!("wmts_kvp_requests_total", "operation" => operation.as_str()).increment(1);
}

/// Count a request answered with an exception report.
pub fn record_exception(err: &WmtsError) {
    counter!("wmts_kvp_exceptions_total", "code" => err.exception_code()).increment(1);
}
