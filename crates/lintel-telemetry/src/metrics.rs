//! Prometheus metrics for Lintel.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `lintel_passes_total` | Counter | `restart` | Configuration passes run |
//! | `lintel_interceptors_installed_total` | Counter | `source` | Interceptors installed |
//! | `lintel_candidates_rejected_total` | Counter | `reason` | Candidates skipped by filtering or dedup |
//! | `lintel_resolution_failures_total` | Counter | - | Scanned keys that did not resolve |
//! | `lintel_instantiation_failures_total` | Counter | - | Factories that failed |
//! | `lintel_discovery_failures_total` | Counter | - | Namespace scans that failed |
//! | `lintel_fallback_activations_total` | Counter | - | Passes that installed the fallback |
//! | `lintel_intercepted_requests_total` | Counter | `interceptor` | Requests entering an interceptor |
//!
//! Recording functions are safe to call before [`init_metrics`]; without an
//! installed recorder they do nothing.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metric names.
pub mod names {
    /// Configuration passes run.
    pub const PASSES: &str = "lintel_passes_total";
    /// Interceptors installed.
    pub const INSTALLED: &str = "lintel_interceptors_installed_total";
    /// Candidates skipped.
    pub const REJECTED: &str = "lintel_candidates_rejected_total";
    /// Unresolvable keys.
    pub const RESOLUTION_FAILURES: &str = "lintel_resolution_failures_total";
    /// Failed factories.
    pub const INSTANTIATION_FAILURES: &str = "lintel_instantiation_failures_total";
    /// Failed scans.
    pub const DISCOVERY_FAILURES: &str = "lintel_discovery_failures_total";
    /// Fallback activations.
    pub const FALLBACK_ACTIVATIONS: &str = "lintel_fallback_activations_total";
    /// Requests entering an interceptor.
    pub const INTERCEPTED_REQUESTS: &str = "lintel_intercepted_requests_total";
}

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Installs the Prometheus recorder.
///
/// The handle is kept globally; see [`render_metrics`]. Lintel does not
/// serve `/metrics` itself, the host exposes the rendered text.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);

    register_metric_descriptions();

    Ok(())
}

/// Returns the global metrics handle if initialized.
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(names::PASSES, "Total number of interceptor configuration passes");
    describe_counter!(
        names::INSTALLED,
        "Total number of interceptors installed into the pipeline"
    );
    describe_counter!(
        names::REJECTED,
        "Total number of discovery candidates skipped, by reason"
    );
    describe_counter!(
        names::RESOLUTION_FAILURES,
        "Total number of scanned type keys that could not be resolved"
    );
    describe_counter!(
        names::INSTANTIATION_FAILURES,
        "Total number of interceptor factories that failed"
    );
    describe_counter!(
        names::DISCOVERY_FAILURES,
        "Total number of namespace scans that failed"
    );
    describe_counter!(
        names::FALLBACK_ACTIVATIONS,
        "Total number of passes that installed the default interceptor"
    );
    describe_counter!(
        names::INTERCEPTED_REQUESTS,
        "Total number of requests entering an interceptor"
    );
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Records a configuration pass.
pub fn record_pass(restart: bool) {
    counter!(names::PASSES, "restart" => restart.to_string()).increment(1);
}

/// Records a successful install.
///
/// `source` is one of `scan`, `application`, `fallback`.
pub fn record_install(source: &'static str) {
    counter!(names::INSTALLED, "source" => source).increment(1);
}

/// Records a skipped candidate.
pub fn record_rejection(reason: &'static str) {
    counter!(names::REJECTED, "reason" => reason).increment(1);
}

/// Records a key that failed to resolve.
pub fn record_resolution_failure() {
    counter!(names::RESOLUTION_FAILURES).increment(1);
}

/// Records a failed factory.
pub fn record_instantiation_failure() {
    counter!(names::INSTANTIATION_FAILURES).increment(1);
}

/// Records a failed namespace scan.
pub fn record_discovery_failure() {
    counter!(names::DISCOVERY_FAILURES).increment(1);
}

/// Records a fallback activation.
pub fn record_fallback_activation() {
    counter!(names::FALLBACK_ACTIVATIONS).increment(1);
}

/// Records a request entering an interceptor.
pub fn record_intercepted(interceptor: &'static str) {
    counter!(names::INTERCEPTED_REQUESTS, "interceptor" => interceptor).increment(1);
}
