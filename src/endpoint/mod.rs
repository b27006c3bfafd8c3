//! Endpoint units over a [`TodoService`].
//!
//! # Data Flow
//! ```text
//! transport (JSON payload + RequestContext)
//!     → transport.rs (calling / called endpoint log lines)
//!     → endpoint unit (decode payload, race call against cancellation, encode)
//!     → Arc<dyn TodoService> (instrumenting → logging → basic → store)
//! ```
//!
//! # Design Decisions
//! - Every unit has the same shape: `EndpointRequest` in, `serde_json::Value` out
//! - Units are boxed `tower` services, cheap to clone per request and `Send + Sync`,
//!   so an `Endpoints` value can be shared by per-request tasks
//! - Cancellation drops the in-flight service future, which drops the store call

pub mod transport;

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower::util::BoxCloneSyncService;
use tower::{Layer, ServiceExt};

use crate::todo::{
    CreateTodoInput, PaginationInput, ServiceError, ServiceResult, TodoSearchInput, TodoService,
    UpdateTodoInput,
};

pub use transport::{TransportLogging, TransportLoggingLayer};

/// Endpoint names, as used for transport labels and dispatch.
pub mod name {
    pub const GET_TODO: &str = "getTodo";
    pub const TODO_PAGES: &str = "todoPages";
    pub const TODO_SEARCH: &str = "todoSearch";
    pub const CREATE_TODO: &str = "createTodo";
    pub const UPDATE_TODO: &str = "updateTodo";
}

/// Per-request context supplied by the transport.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Cancelled when the caller gives up on the request.
    pub cancellation: CancellationToken,
    /// Caller identity; recorded as creator or updater.
    pub identity: String,
}

impl RequestContext {
    pub fn new(identity: impl Into<String>) -> Self {
        Self::with_cancellation(identity, CancellationToken::new())
    }

    pub fn with_cancellation(identity: impl Into<String>, cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            identity: identity.into(),
        }
    }
}

/// Untyped request envelope.
#[derive(Debug, Clone)]
pub struct EndpointRequest {
    pub context: RequestContext,
    pub payload: serde_json::Value,
}

impl EndpointRequest {
    pub fn new(context: RequestContext, payload: serde_json::Value) -> Self {
        Self { context, payload }
    }
}

/// Errors surfaced by an endpoint unit.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("malformed request: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// A single independently invocable operation.
pub type Endpoint = BoxCloneSyncService<EndpointRequest, serde_json::Value, EndpointError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTodoRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoPagesRequest {
    pub pagination: PaginationInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoSearchRequest {
    #[serde(default)]
    pub search: TodoSearchInput,
    pub pagination: PaginationInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub input: CreateTodoInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    pub id: String,
    pub input: UpdateTodoInput,
}

/// The full endpoint set for one service instance.
#[derive(Clone)]
pub struct Endpoints {
    pub get_todo: Endpoint,
    pub todo_pages: Endpoint,
    pub todo_search: Endpoint,
    pub create_todo: Endpoint,
    pub update_todo: Endpoint,
}

impl Endpoints {
    /// Look up an endpoint by its name.
    pub fn get(&self, endpoint: &str) -> Option<Endpoint> {
        match endpoint {
            name::GET_TODO => Some(self.get_todo.clone()),
            name::TODO_PAGES => Some(self.todo_pages.clone()),
            name::TODO_SEARCH => Some(self.todo_search.clone()),
            name::CREATE_TODO => Some(self.create_todo.clone()),
            name::UPDATE_TODO => Some(self.update_todo.clone()),
            _ => None,
        }
    }

    /// Invoke the named endpoint once.
    ///
    /// The unit is cloned up front, so the returned future does not borrow `self`.
    pub fn call(
        &self,
        endpoint: &str,
        request: EndpointRequest,
    ) -> impl Future<Output = Option<Result<serde_json::Value, EndpointError>>> + Send + 'static
    {
        let unit = self.get(endpoint);
        async move {
            let unit = unit?;
            Some(unit.oneshot(request).await)
        }
    }
}

/// Build every endpoint over `svc`, each wrapped in transport logging.
pub fn make_endpoints(svc: Arc<dyn TodoService>) -> Endpoints {
    Endpoints {
        get_todo: with_transport_logging(name::GET_TODO, make_get_todo_endpoint(svc.clone())),
        todo_pages: with_transport_logging(name::TODO_PAGES, make_todo_pages_endpoint(svc.clone())),
        todo_search: with_transport_logging(
            name::TODO_SEARCH,
            make_todo_search_endpoint(svc.clone()),
        ),
        create_todo: with_transport_logging(
            name::CREATE_TODO,
            make_create_todo_endpoint(svc.clone()),
        ),
        update_todo: with_transport_logging(name::UPDATE_TODO, make_update_todo_endpoint(svc)),
    }
}

fn with_transport_logging(endpoint: &'static str, unit: Endpoint) -> Endpoint {
    BoxCloneSyncService::new(TransportLoggingLayer::new(endpoint).layer(unit))
}

pub fn make_get_todo_endpoint(svc: Arc<dyn TodoService>) -> Endpoint {
    make_endpoint(svc, |svc, req: GetTodoRequest, _identity| async move {
        svc.get_todo(&req.id).await
    })
}

pub fn make_todo_pages_endpoint(svc: Arc<dyn TodoService>) -> Endpoint {
    make_endpoint(svc, |svc, req: TodoPagesRequest, _identity| async move {
        svc.todo_pages(req.pagination).await
    })
}

pub fn make_todo_search_endpoint(svc: Arc<dyn TodoService>) -> Endpoint {
    make_endpoint(svc, |svc, req: TodoSearchRequest, _identity| async move {
        svc.todo_search(req.search, req.pagination).await
    })
}

pub fn make_create_todo_endpoint(svc: Arc<dyn TodoService>) -> Endpoint {
    make_endpoint(svc, |svc, req: CreateTodoRequest, identity| async move {
        svc.create_todo(req.input, &identity).await
    })
}

pub fn make_update_todo_endpoint(svc: Arc<dyn TodoService>) -> Endpoint {
    make_endpoint(svc, |svc, req: UpdateTodoRequest, identity| async move {
        svc.update_todo(&req.id, req.input, &identity).await
    })
}

fn make_endpoint<Req, Resp, F, Fut>(svc: Arc<dyn TodoService>, call: F) -> Endpoint
where
    Req: DeserializeOwned + Send + 'static,
    Resp: Serialize + Send + 'static,
    F: Fn(Arc<dyn TodoService>, Req, String) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = ServiceResult<Resp>> + Send + 'static,
{
    let unit = tower::service_fn(move |request: EndpointRequest| {
        let svc = svc.clone();
        let call = call.clone();
        async move {
            let EndpointRequest { context, payload } = request;
            let req: Req = serde_json::from_value(payload).map_err(EndpointError::Decode)?;
            let pending = call(svc, req, context.identity);

            let response = tokio::select! {
                biased;
                _ = context.cancellation.cancelled() => return Err(EndpointError::Cancelled),
                result = pending => result?,
            };

            serde_json::to_value(response).map_err(EndpointError::Encode)
        }
    });
    BoxCloneSyncService::new(unit)
}
