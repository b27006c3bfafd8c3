//! Configuration validation.
//!
//! Serde handles the syntactic checks; this module checks value ranges and
//! naming rules. All problems are reported, not just the first.

use thiserror::Error;

use crate::config::schema::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    LogLevel(String),

    #[error("observability.{field} '{value}' must be non-empty and use only [A-Za-z0-9_]")]
    MetricName { field: &'static str, value: String },

    #[error("app.operator must not be empty")]
    EmptyOperator,

    #[error("store.data_file must not be empty when store.persist is set")]
    EmptyDataFile,
}

/// Check a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let observability = &config.observability;

    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(observability.log_level.clone()));
    }

    for (field, value) in [
        ("metrics_namespace", &observability.metrics_namespace),
        ("metrics_subsystem", &observability.metrics_subsystem),
    ] {
        if !is_metric_name_part(value) {
            errors.push(ValidationError::MetricName {
                field,
                value: value.clone(),
            });
        }
    }

    if config.app.operator.trim().is_empty() {
        errors.push(ValidationError::EmptyOperator);
    }

    if config.store.persist && config.store.data_file.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyDataFile);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_metric_name_part(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
