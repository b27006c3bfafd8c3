//! Todo service subsystem.
//!
//! # Data Flow
//! ```text
//! endpoint
//!     → instrumenting.rs (request counter + latency, per method/error)
//!     → logging.rs (call start / call end lines)
//!     → service.rs (BasicService: paging, search clauses, partial update)
//!         → search.rs (TodoSearchInput → ordered Vec<Clause>)
//!         → pagination.rs (1-based checks, total pages)
//!         → TodoStore
//!     ← projection.rs (TodoRecord → Todo)
//! ```
//!
//! # Design Decisions
//! - One trait, `TodoService`, for the business logic and each decorator
//! - Decorators are `tower::Layer`s so the chain composes with `ServiceBuilder`
//! - Decorators observe results; they never alter, retry or swallow them
//! - No shared mutable state outside the store and the metrics sink

pub mod error;
pub mod instrumenting;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod projection;
pub mod search;
pub mod service;

pub use error::{ErrorKind, ServiceError};
pub use instrumenting::{InstrumentingLayer, InstrumentingMiddleware, RequestMetrics};
pub use logging::{LoggingLayer, LoggingMiddleware};
pub use model::{
    CreateTodoInput, PaginationInfo, PaginationInput, Todo, TodoPagination, TodoRecord,
    TodoSearchInput, TodoStatus, UpdateTodoInput,
};
pub use service::{BasicService, ServiceResult, TodoService};
