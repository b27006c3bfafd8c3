//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → read once at startup by main.rs
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - A missing config file means "use defaults"
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{AppConfig, LogFormat, ObservabilityConfig, ServiceConfig, StoreConfig};
pub use validation::ValidationError;
