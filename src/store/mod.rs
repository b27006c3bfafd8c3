//! Persistence boundary.
//!
//! # Data Flow
//! ```text
//! BasicService
//!     → TodoStore (trait; one await per operation)
//!         → memory.rs (DashMap-backed, optional JSON file)
//! ```
//!
//! # Design Decisions
//! - The service sees only this trait; schema and connections stay behind it
//! - The store owns id and timestamp assignment
//! - Errors are reported as-is and never retried by callers

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::todo::model::TodoRecord;
use crate::todo::pagination::PageRequest;
use crate::todo::search::Clause;

pub use memory::MemoryStore;

/// Errors reported by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record matches the identifier.
    #[error("todo {id} not found")]
    NotFound { id: String },

    /// Underlying I/O failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other backend failure (constraint violation, connection loss).
    #[error("store backend error: {message}")]
    Backend { message: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One page of records and the number of records matching the query overall.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    pub records: Vec<TodoRecord>,
    pub total_count: u64,
}

/// Storage operations the todo service depends on.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Fetch one record by its decimal id.
    async fn get_todo(&self, id: &str) -> StoreResult<TodoRecord>;

    /// List a page of all records.
    async fn pages(&self, page: PageRequest) -> StoreResult<RecordPage>;

    /// List a page of the records satisfying every clause.
    async fn search(&self, page: PageRequest, clauses: &[Clause]) -> StoreResult<RecordPage>;

    /// Insert a new record. The returned record carries the assigned id and timestamps.
    async fn create(&self, record: TodoRecord) -> StoreResult<TodoRecord>;

    /// Overwrite the existing record with the same id.
    async fn save(&self, record: TodoRecord) -> StoreResult<()>;
}

#[async_trait]
impl<T: TodoStore + ?Sized> TodoStore for Arc<T> {
    async fn get_todo(&self, id: &str) -> StoreResult<TodoRecord> {
        (**self).get_todo(id).await
    }

    async fn pages(&self, page: PageRequest) -> StoreResult<RecordPage> {
        (**self).pages(page).await
    }

    async fn search(&self, page: PageRequest, clauses: &[Clause]) -> StoreResult<RecordPage> {
        (**self).search(page, clauses).await
    }

    async fn create(&self, record: TodoRecord) -> StoreResult<TodoRecord> {
        (**self).create(record).await
    }

    async fn save(&self, record: TodoRecord) -> StoreResult<()> {
        (**self).save(record).await
    }
}
