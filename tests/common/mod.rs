//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use dashmap::DashMap;
use tokio::sync::Notify;

use todo_service::store::{RecordPage, StoreError, StoreResult, TodoStore};
use todo_service::todo::pagination::PageRequest;
use todo_service::todo::search::Clause;
use todo_service::todo::{CreateTodoInput, RequestMetrics, TodoRecord, TodoStatus};
use todo_service::MemoryStore;

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
}

/// A record with id `id` created on day `id` of January 2024.
pub fn record(id: u64, code: &str, name: &str) -> TodoRecord {
    let created = at(2024, 1, id as u32);
    TodoRecord {
        id,
        content_code: code.to_string(),
        content_name: name.to_string(),
        description: format!("task {}", id),
        start_date: created,
        end_date: at(2024, 2, 1),
        status: TodoStatus::Active.as_str().to_string(),
        created_at: created,
        updated_at: created,
        created_by: "seed".to_string(),
        updated_by: String::new(),
    }
}

/// A store holding records `1..=n`.
pub fn seeded_store(n: u64) -> MemoryStore {
    MemoryStore::with_records((1..=n).map(|i| record(i, &format!("T-{}", i), "Task")), None)
}

pub fn create_input(code: &str) -> CreateTodoInput {
    CreateTodoInput {
        content_code: code.to_string(),
        content_name: format!("{} name", code),
        description: "created in test".to_string(),
        start_date: at(2024, 3, 1),
        end_date: at(2024, 3, 31),
        status: TodoStatus::Active,
    }
}

/// Counts samples per `(method, error)`.
#[derive(Default)]
pub struct RecordingMetrics {
    samples: DashMap<(&'static str, bool), u64>,
}

impl RecordingMetrics {
    pub fn count(&self, method: &'static str, error: bool) -> u64 {
        self.samples.get(&(method, error)).map(|c| *c).unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.samples.iter().map(|c| *c.value()).sum()
    }
}

impl RequestMetrics for RecordingMetrics {
    fn observe(&self, method: &'static str, error: bool, _elapsed: Duration) {
        *self.samples.entry((method, error)).or_insert(0) += 1;
    }
}

/// Wraps a store and counts every call that reaches it.
pub struct CountingStore<S> {
    pub inner: S,
    calls: AtomicUsize,
    searches: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls that went through `search` rather than `pages`.
    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<S: TodoStore> TodoStore for CountingStore<S> {
    async fn get_todo(&self, id: &str) -> StoreResult<TodoRecord> {
        self.hit();
        self.inner.get_todo(id).await
    }

    async fn pages(&self, page: PageRequest) -> StoreResult<RecordPage> {
        self.hit();
        self.inner.pages(page).await
    }

    async fn search(&self, page: PageRequest, clauses: &[Clause]) -> StoreResult<RecordPage> {
        self.hit();
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search(page, clauses).await
    }

    async fn create(&self, record: TodoRecord) -> StoreResult<TodoRecord> {
        self.hit();
        self.inner.create(record).await
    }

    async fn save(&self, record: TodoRecord) -> StoreResult<()> {
        self.hit();
        self.inner.save(record).await
    }
}

/// Every operation fails with a backend error.
pub struct FailingStore;

pub const BACKEND_FAILURE: &str = "connection reset";

fn backend_failure() -> StoreError {
    StoreError::Backend {
        message: BACKEND_FAILURE.to_string(),
    }
}

#[async_trait]
impl TodoStore for FailingStore {
    async fn get_todo(&self, _id: &str) -> StoreResult<TodoRecord> {
        Err(backend_failure())
    }

    async fn pages(&self, _page: PageRequest) -> StoreResult<RecordPage> {
        Err(backend_failure())
    }

    async fn search(&self, _page: PageRequest, _clauses: &[Clause]) -> StoreResult<RecordPage> {
        Err(backend_failure())
    }

    async fn create(&self, _record: TodoRecord) -> StoreResult<TodoRecord> {
        Err(backend_failure())
    }

    async fn save(&self, _record: TodoRecord) -> StoreResult<()> {
        Err(backend_failure())
    }
}

/// Rewrites the description on save, the way a database trigger would.
pub struct RewritingStore {
    pub inner: MemoryStore,
}

pub const REWRITTEN: &str = "normalised by store";

#[async_trait]
impl TodoStore for RewritingStore {
    async fn get_todo(&self, id: &str) -> StoreResult<TodoRecord> {
        self.inner.get_todo(id).await
    }

    async fn pages(&self, page: PageRequest) -> StoreResult<RecordPage> {
        self.inner.pages(page).await
    }

    async fn search(&self, page: PageRequest, clauses: &[Clause]) -> StoreResult<RecordPage> {
        self.inner.search(page, clauses).await
    }

    async fn create(&self, record: TodoRecord) -> StoreResult<TodoRecord> {
        self.inner.create(record).await
    }

    async fn save(&self, mut record: TodoRecord) -> StoreResult<()> {
        record.description = REWRITTEN.to_string();
        self.inner.save(record).await
    }
}

/// Sets its flag when dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// `get_todo` never completes. Lets tests observe that cancellation drops the call.
#[derive(Default)]
pub struct PendingStore {
    pub started: Arc<Notify>,
    pub dropped: Arc<AtomicBool>,
}

impl PendingStore {
    pub fn was_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TodoStore for PendingStore {
    async fn get_todo(&self, _id: &str) -> StoreResult<TodoRecord> {
        let _flag = DropFlag(self.dropped.clone());
        self.started.notify_one();
        std::future::pending().await
    }

    async fn pages(&self, _page: PageRequest) -> StoreResult<RecordPage> {
        Ok(RecordPage::default())
    }

    async fn search(&self, _page: PageRequest, _clauses: &[Clause]) -> StoreResult<RecordPage> {
        Ok(RecordPage::default())
    }

    async fn create(&self, record: TodoRecord) -> StoreResult<TodoRecord> {
        Ok(record)
    }

    async fn save(&self, _record: TodoRecord) -> StoreResult<()> {
        Ok(())
    }
}
