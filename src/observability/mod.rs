//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Service chain produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counter + latency histogram)
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//!     → Prometheus exposition (rendered from the recorder handle)
//! ```
//!
//! # Design Decisions
//! - The subscriber and recorder are installed once, by the binary
//! - Library code only emits; it never configures sinks
//! - Metric updates are atomic and safe under concurrent requests

pub mod logging;
pub mod metrics;

pub use metrics::PrometheusMetrics;
