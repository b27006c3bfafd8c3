//! Todo record service library.
//!
//! ```text
//!   transport ─▶ endpoint ─▶ instrumenting ─▶ logging ─▶ BasicService ─▶ TodoStore
//!   (JSON +      (decode,     (counter +       (start/    (paging,        (memory,
//!    context)     cancel)      latency)         end)       search, merge)  JSON file)
//! ```

pub mod config;
pub mod endpoint;
pub mod observability;
pub mod store;
pub mod todo;

use std::sync::Arc;

use tower::ServiceBuilder;

pub use config::ServiceConfig;
pub use endpoint::{make_endpoints, Endpoints};
pub use store::{MemoryStore, TodoStore};
pub use todo::{BasicService, TodoService};

use todo::{InstrumentingLayer, LoggingLayer, RequestMetrics};

/// Assemble the reference chain: instrumenting → logging → business logic → `store`.
pub fn build_service<S>(store: S, metrics: Arc<dyn RequestMetrics>) -> Arc<dyn TodoService>
where
    S: TodoStore + 'static,
{
    let svc = ServiceBuilder::new()
        .layer(InstrumentingLayer::new(metrics))
        .layer(LoggingLayer::new())
        .service(BasicService::new(store));
    Arc::new(svc)
}
