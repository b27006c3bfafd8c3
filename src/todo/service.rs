//! The todo service capability and its business-logic implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::store::TodoStore;
use crate::todo::error::ServiceError;
use crate::todo::model::{
    CreateTodoInput, PaginationInput, Todo, TodoPagination, TodoRecord, TodoSearchInput,
    UpdateTodoInput,
};
use crate::todo::pagination::PageRequest;
use crate::todo::projection::{to_model_todo, to_model_todos};
use crate::todo::search::build_clauses;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Operation names, shared by log lines and metric labels.
pub mod method {
    pub const GET_TODO: &str = "get_todo";
    pub const TODO_PAGES: &str = "todo_pages";
    pub const TODO_SEARCH: &str = "todo_search";
    pub const CREATE_TODO: &str = "create_todo";
    pub const UPDATE_TODO: &str = "update_todo";
}

/// The five todo operations.
///
/// Business logic and every decorator implement this same trait, so any of
/// them can stand in for another at any layer of the chain.
#[async_trait]
pub trait TodoService: Send + Sync {
    async fn get_todo(&self, id: &str) -> ServiceResult<Todo>;

    async fn todo_pages(&self, pagination: PaginationInput) -> ServiceResult<TodoPagination>;

    async fn todo_search(
        &self,
        search: TodoSearchInput,
        pagination: PaginationInput,
    ) -> ServiceResult<TodoPagination>;

    async fn create_todo(&self, input: CreateTodoInput, created_by: &str) -> ServiceResult<Todo>;

    async fn update_todo(
        &self,
        id: &str,
        input: UpdateTodoInput,
        updated_by: &str,
    ) -> ServiceResult<Todo>;
}

macro_rules! forward_todo_service {
    ($ty:ty) => {
        #[async_trait]
        impl<T: TodoService + ?Sized> TodoService for $ty {
            async fn get_todo(&self, id: &str) -> ServiceResult<Todo> {
                (**self).get_todo(id).await
            }

            async fn todo_pages(
                &self,
                pagination: PaginationInput,
            ) -> ServiceResult<TodoPagination> {
                (**self).todo_pages(pagination).await
            }

            async fn todo_search(
                &self,
                search: TodoSearchInput,
                pagination: PaginationInput,
            ) -> ServiceResult<TodoPagination> {
                (**self).todo_search(search, pagination).await
            }

            async fn create_todo(
                &self,
                input: CreateTodoInput,
                created_by: &str,
            ) -> ServiceResult<Todo> {
                (**self).create_todo(input, created_by).await
            }

            async fn update_todo(
                &self,
                id: &str,
                input: UpdateTodoInput,
                updated_by: &str,
            ) -> ServiceResult<Todo> {
                (**self).update_todo(id, input, updated_by).await
            }
        }
    };
}

forward_todo_service!(Arc<T>);
forward_todo_service!(Box<T>);

/// Todo business logic over a store.
#[derive(Debug, Clone)]
pub struct BasicService<S> {
    store: S,
}

impl<S: TodoStore> BasicService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: TodoStore> TodoService for BasicService<S> {
    async fn get_todo(&self, id: &str) -> ServiceResult<Todo> {
        let record = self.store.get_todo(id).await?;
        Ok(to_model_todo(record))
    }

    async fn todo_pages(&self, pagination: PaginationInput) -> ServiceResult<TodoPagination> {
        let page = PageRequest::validate(method::TODO_PAGES, pagination)?;
        let result = self.store.pages(page).await?;

        Ok(TodoPagination {
            pagination_info: page.info(result.total_count),
            todos: to_model_todos(result.records),
        })
    }

    async fn todo_search(
        &self,
        search: TodoSearchInput,
        pagination: PaginationInput,
    ) -> ServiceResult<TodoPagination> {
        let page = PageRequest::validate(method::TODO_SEARCH, pagination)?;
        let result = if search.is_empty() {
            self.store.pages(page).await?
        } else {
            self.store.search(page, &build_clauses(&search)).await?
        };

        Ok(TodoPagination {
            pagination_info: page.info(result.total_count),
            todos: to_model_todos(result.records),
        })
    }

    async fn create_todo(&self, input: CreateTodoInput, created_by: &str) -> ServiceResult<Todo> {
        // id and timestamps are placeholders; the store assigns them.
        let now = chrono::Utc::now();
        let record = TodoRecord {
            id: 0,
            content_code: input.content_code,
            content_name: input.content_name,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status.as_str().to_string(),
            created_at: now,
            updated_at: now,
            created_by: created_by.to_string(),
            updated_by: String::new(),
        };

        let created = self.store.create(record).await?;
        Ok(to_model_todo(created))
    }

    async fn update_todo(
        &self,
        id: &str,
        input: UpdateTodoInput,
        updated_by: &str,
    ) -> ServiceResult<Todo> {
        let mut record = self.store.get_todo(id).await?;
        apply_update(&mut record, input, updated_by);
        self.store.save(record).await?;

        let updated = self.store.get_todo(id).await?;
        Ok(to_model_todo(updated))
    }
}

/// Overwrite the fields present in `input`; `updated_by` is always replaced.
fn apply_update(record: &mut TodoRecord, input: UpdateTodoInput, updated_by: &str) {
    record.updated_by = updated_by.to_string();

    if let Some(content_code) = input.content_code {
        record.content_code = content_code;
    }
    if let Some(content_name) = input.content_name {
        record.content_name = content_name;
    }
    if let Some(description) = input.description {
        record.description = description;
    }
    if let Some(start_date) = input.start_date {
        record.start_date = start_date;
    }
    if let Some(end_date) = input.end_date {
        record.end_date = end_date;
    }
    if let Some(status) = input.status {
        record.status = status.as_str().to_string();
    }
}
