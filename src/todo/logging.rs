//! Logging decorator for [`TodoService`].
//!
//! Emits `calling service` before delegating and `called service` once the
//! call ends. The completion line is written by a guard on drop, so it also
//! appears when the call fails or the future is dropped mid-flight.

use std::time::Instant;

use async_trait::async_trait;
use tower::Layer;

use crate::todo::error::ServiceError;
use crate::todo::model::{
    CreateTodoInput, PaginationInput, Todo, TodoPagination, TodoSearchInput, UpdateTodoInput,
};
use crate::todo::service::{method, ServiceResult, TodoService};

/// Layer producing [`LoggingMiddleware`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer;

impl LoggingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware::new(inner)
    }
}

/// Logs every call on the wrapped service. Results pass through unchanged.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S> LoggingMiddleware<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

/// Writes the completion line when dropped.
struct CallLog {
    method: &'static str,
    begin: Instant,
    outcome: &'static str,
    error: Option<String>,
}

impl CallLog {
    fn begin(method: &'static str) -> Self {
        Self {
            method,
            begin: Instant::now(),
            outcome: "cancelled",
            error: None,
        }
    }

    fn finish<T>(&mut self, result: &Result<T, ServiceError>) {
        match result {
            Ok(_) => self.outcome = "ok",
            Err(e) => {
                self.outcome = "error";
                self.error = Some(e.to_string());
            }
        }
    }
}

impl Drop for CallLog {
    fn drop(&mut self) {
        tracing::info!(
            method = self.method,
            took_us = self.begin.elapsed().as_micros() as u64,
            outcome = self.outcome,
            error = self.error.as_deref(),
            "called service"
        );
    }
}

#[async_trait]
impl<S: TodoService> TodoService for LoggingMiddleware<S> {
    async fn get_todo(&self, id: &str) -> ServiceResult<Todo> {
        tracing::info!(method = method::GET_TODO, id, "calling service");
        let mut call = CallLog::begin(method::GET_TODO);
        let result = self.inner.get_todo(id).await;
        call.finish(&result);
        result
    }

    async fn todo_pages(&self, pagination: PaginationInput) -> ServiceResult<TodoPagination> {
        tracing::info!(
            method = method::TODO_PAGES,
            count = pagination.count,
            page = pagination.page,
            "calling service"
        );
        let mut call = CallLog::begin(method::TODO_PAGES);
        let result = self.inner.todo_pages(pagination).await;
        call.finish(&result);
        result
    }

    async fn todo_search(
        &self,
        search: TodoSearchInput,
        pagination: PaginationInput,
    ) -> ServiceResult<TodoPagination> {
        tracing::info!(
            method = method::TODO_SEARCH,
            count = pagination.count,
            page = pagination.page,
            filters = ?search,
            "calling service"
        );
        let mut call = CallLog::begin(method::TODO_SEARCH);
        let result = self.inner.todo_search(search, pagination).await;
        call.finish(&result);
        result
    }

    async fn create_todo(&self, input: CreateTodoInput, created_by: &str) -> ServiceResult<Todo> {
        tracing::info!(
            method = method::CREATE_TODO,
            content_code = %input.content_code,
            created_by,
            "calling service"
        );
        let mut call = CallLog::begin(method::CREATE_TODO);
        let result = self.inner.create_todo(input, created_by).await;
        call.finish(&result);
        result
    }

    async fn update_todo(
        &self,
        id: &str,
        input: UpdateTodoInput,
        updated_by: &str,
    ) -> ServiceResult<Todo> {
        tracing::info!(
            method = method::UPDATE_TODO,
            id,
            updated_by,
            changes = ?input,
            "calling service"
        );
        let mut call = CallLog::begin(method::UPDATE_TODO);
        let result = self.inner.update_todo(id, input, updated_by).await;
        call.finish(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::logging::capture::capture;
    use crate::store::MemoryStore;
    use crate::todo::error::ErrorKind;
    use crate::todo::service::BasicService;
    use std::time::Duration;
    use tracing::Level;

    /// Never completes any call.
    struct Stalled;

    #[async_trait]
    impl TodoService for Stalled {
        async fn get_todo(&self, _id: &str) -> ServiceResult<Todo> {
            std::future::pending().await
        }

        async fn todo_pages(&self, _pagination: PaginationInput) -> ServiceResult<TodoPagination> {
            std::future::pending().await
        }

        async fn todo_search(
            &self,
            _search: TodoSearchInput,
            _pagination: PaginationInput,
        ) -> ServiceResult<TodoPagination> {
            std::future::pending().await
        }

        async fn create_todo(&self, _input: CreateTodoInput, _by: &str) -> ServiceResult<Todo> {
            std::future::pending().await
        }

        async fn update_todo(
            &self,
            _id: &str,
            _input: UpdateTodoInput,
            _by: &str,
        ) -> ServiceResult<Todo> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_two_lines_per_failed_call() {
        let (capture, _guard) = capture(Level::INFO);
        let svc = LoggingLayer::new().layer(BasicService::new(MemoryStore::default()));

        let err = svc.get_todo("404").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let lines = capture.lines();
        assert_eq!(lines.len(), 2, "{:?}", lines);
        assert!(lines[0].contains("calling service"));
        assert!(lines[0].contains("get_todo"));
        assert!(lines[1].contains("called service"));
        assert!(lines[1].contains("outcome=\"error\""));
    }

    #[tokio::test]
    async fn test_pages_input_summary_logged() {
        let (capture, _guard) = capture(Level::INFO);
        let svc = LoggingMiddleware::new(BasicService::new(MemoryStore::default()));

        let page = svc.todo_pages(PaginationInput { count: 3, page: 1 }).await.unwrap();
        assert_eq!(page.pagination_info.total_count, 0);

        let lines = capture.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("count=3"));
        assert!(lines[0].contains("page=1"));
        assert!(lines[1].contains("outcome=\"ok\""));
        assert!(lines[1].contains("took_us="));
    }

    #[tokio::test]
    async fn test_invalid_argument_passes_through() {
        let (_capture, _guard) = capture(Level::INFO);
        let svc = LoggingMiddleware::new(BasicService::new(MemoryStore::default()));

        let err = svc
            .todo_search(TodoSearchInput::default(), PaginationInput { count: 0, page: 1 })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "todo_search: count must be >= 1 (1 based indexing)");
    }

    #[tokio::test]
    async fn test_dropped_call_logs_cancelled() {
        let (capture, _guard) = capture(Level::INFO);
        let svc = LoggingMiddleware::new(Stalled);

        let timed_out = tokio::time::timeout(Duration::from_millis(20), svc.get_todo("7")).await;
        assert!(timed_out.is_err());

        let lines = capture.lines();
        assert_eq!(lines.len(), 2, "{:?}", lines);
        assert!(lines[0].contains("calling service"));
        assert!(lines[1].contains("called service"));
        assert!(lines[1].contains("outcome=\"cancelled\""));
        assert!(!lines[1].contains("error="));
    }
}
