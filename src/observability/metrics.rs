//! Metrics collection and exposition.
//!
//! # Metrics
//! - `<namespace>_<subsystem>_request_count` (counter): calls by method, error
//! - `<namespace>_<subsystem>_request_latency_microseconds` (histogram): call duration
//!
//! Both are labeled `method` and `error` (`"true"` / `"false"`). With the
//! default configuration the prefix is `my_group_todo_service`.

use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::config::ObservabilityConfig;
use crate::todo::RequestMetrics;

/// [`RequestMetrics`] backed by the global `metrics` recorder.
#[derive(Debug, Clone)]
pub struct PrometheusMetrics {
    request_count: String,
    request_latency: String,
}

impl PrometheusMetrics {
    pub fn new(namespace: &str, subsystem: &str) -> Self {
        Self {
            request_count: format!("{}_{}_request_count", namespace, subsystem),
            request_latency: format!("{}_{}_request_latency_microseconds", namespace, subsystem),
        }
    }

    pub fn from_config(config: &ObservabilityConfig) -> Self {
        Self::new(&config.metrics_namespace, &config.metrics_subsystem)
    }

    pub fn request_count_name(&self) -> &str {
        &self.request_count
    }

    pub fn request_latency_name(&self) -> &str {
        &self.request_latency
    }

    /// Register help text with the installed recorder.
    pub fn describe(&self) {
        metrics::describe_counter!(self.request_count.clone(), "Number of requests received.");
        metrics::describe_histogram!(
            self.request_latency.clone(),
            "Total duration of requests in microseconds."
        );
    }
}

impl RequestMetrics for PrometheusMetrics {
    fn observe(&self, method: &'static str, error: bool, elapsed: Duration) {
        let error = if error { "true" } else { "false" };
        metrics::counter!(self.request_count.clone(), "method" => method, "error" => error)
            .increment(1);
        metrics::histogram!(self.request_latency.clone(), "method" => method, "error" => error)
            .record(elapsed.as_secs_f64() * 1_000_000.0);
    }
}

/// Install the Prometheus recorder globally and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}
