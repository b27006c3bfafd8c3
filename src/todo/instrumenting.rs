//! Metrics decorator for [`TodoService`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tower::Layer;

use crate::todo::model::{
    CreateTodoInput, PaginationInput, Todo, TodoPagination, TodoSearchInput, UpdateTodoInput,
};
use crate::todo::service::{method, ServiceResult, TodoService};

/// Sink for per-call request metrics.
///
/// Implementations are shared by every in-flight request and must accept
/// concurrent calls without losing updates.
pub trait RequestMetrics: Send + Sync {
    /// Count one call of `method` and record how long it took.
    fn observe(&self, method: &'static str, error: bool, elapsed: Duration);
}

impl<T: RequestMetrics + ?Sized> RequestMetrics for Arc<T> {
    fn observe(&self, method: &'static str, error: bool, elapsed: Duration) {
        (**self).observe(method, error, elapsed)
    }
}

/// Layer producing [`InstrumentingMiddleware`].
#[derive(Clone)]
pub struct InstrumentingLayer {
    metrics: Arc<dyn RequestMetrics>,
}

impl InstrumentingLayer {
    pub fn new(metrics: Arc<dyn RequestMetrics>) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for InstrumentingLayer {
    type Service = InstrumentingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentingMiddleware::new(self.metrics.clone(), inner)
    }
}

/// Records a counter increment and a latency sample for every call,
/// labeled by method and whether the call failed.
#[derive(Clone)]
pub struct InstrumentingMiddleware<S> {
    metrics: Arc<dyn RequestMetrics>,
    inner: S,
}

impl<S> InstrumentingMiddleware<S> {
    pub fn new(metrics: Arc<dyn RequestMetrics>, inner: S) -> Self {
        Self { metrics, inner }
    }

    fn record<T>(&self, method: &'static str, begin: Instant, result: &ServiceResult<T>) {
        self.metrics.observe(method, result.is_err(), begin.elapsed());
    }
}

#[async_trait]
impl<S: TodoService> TodoService for InstrumentingMiddleware<S> {
    async fn get_todo(&self, id: &str) -> ServiceResult<Todo> {
        let begin = Instant::now();
        let result = self.inner.get_todo(id).await;
        self.record(method::GET_TODO, begin, &result);
        result
    }

    async fn todo_pages(&self, pagination: PaginationInput) -> ServiceResult<TodoPagination> {
        let begin = Instant::now();
        let result = self.inner.todo_pages(pagination).await;
        self.record(method::TODO_PAGES, begin, &result);
        result
    }

    async fn todo_search(
        &self,
        search: TodoSearchInput,
        pagination: PaginationInput,
    ) -> ServiceResult<TodoPagination> {
        let begin = Instant::now();
        let result = self.inner.todo_search(search, pagination).await;
        self.record(method::TODO_SEARCH, begin, &result);
        result
    }

    async fn create_todo(&self, input: CreateTodoInput, created_by: &str) -> ServiceResult<Todo> {
        let begin = Instant::now();
        let result = self.inner.create_todo(input, created_by).await;
        self.record(method::CREATE_TODO, begin, &result);
        result
    }

    async fn update_todo(
        &self,
        id: &str,
        input: UpdateTodoInput,
        updated_by: &str,
    ) -> ServiceResult<Todo> {
        let begin = Instant::now();
        let result = self.inner.update_todo(id, input, updated_by).await;
        self.record(method::UPDATE_TODO, begin, &result);
        result
    }
}
