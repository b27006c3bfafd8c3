//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so a partial (or empty) file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the todo service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Application-level settings.
    pub app: AppConfig,

    /// Record store settings.
    pub store: StoreConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Application settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Identity recorded as creator/updater when the caller supplies none.
    pub operator: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            operator: "system".to_string(),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Load records from and save them to `data_file`.
    /// When false the store lives in memory only.
    pub persist: bool,

    /// JSON file holding the records.
    pub data_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            persist: true,
            data_file: PathBuf::from("todos.json"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines for development.
    #[default]
    Pretty,
    /// One JSON object per line for machine parsing.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Install the Prometheus recorder.
    pub metrics_enabled: bool,

    /// First component of every metric name.
    pub metrics_namespace: String,

    /// Second component of every metric name.
    pub metrics_subsystem: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_namespace: "my_group".to_string(),
            metrics_subsystem: "todo_service".to_string(),
        }
    }
}
