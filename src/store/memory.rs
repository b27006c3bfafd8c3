//! In-memory todo store with optional JSON file persistence.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tempfile::NamedTempFile;

use crate::store::{RecordPage, StoreError, StoreResult, TodoStore};
use crate::todo::model::TodoRecord;
use crate::todo::pagination::PageRequest;
use crate::todo::search::{matches_all, Clause};

/// A thread-safe store keeping every record in memory.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<DashMap<u64, TodoRecord>>,
    next_id: Arc<AtomicU64>,
    persistence_path: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MemoryStore {
    /// Create an empty store.
    ///
    /// `persistence_path` is where [`save_to_file`](Self::save_to_file) writes.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            persistence_path,
        }
    }

    /// Create a store holding `records` as-is. New ids continue after the largest one.
    pub fn with_records(
        records: impl IntoIterator<Item = TodoRecord>,
        persistence_path: Option<PathBuf>,
    ) -> Self {
        let store = Self::new(persistence_path);
        let mut max_id = 0;
        for record in records {
            max_id = max_id.max(record.id);
            store.inner.insert(record.id, record);
        }
        store.next_id.store(max_id + 1, Ordering::SeqCst);
        store
    }

    /// Load records from `path` if it exists; otherwise start empty.
    pub fn load_from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new(Some(path.to_path_buf())));
        }

        let reader = BufReader::new(File::open(path)?);
        let records: Vec<TodoRecord> = serde_json::from_reader(reader)?;
        let store = Self::with_records(records, Some(path.to_path_buf()));
        tracing::info!(path = %path.display(), records = store.len(), "Loaded todo store");
        Ok(store)
    }

    /// Write every record to the persistence path, if one is configured.
    ///
    /// Records go to a temporary file in the same directory, which then
    /// replaces the data file. An interrupted save leaves the old file intact.
    pub fn save_to_file(&self) -> StoreResult<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        let records = self.sorted_matching(&[]);
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &records)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        tracing::info!(path = %path.display(), records = records.len(), "Saved todo store");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn sorted_matching(&self, clauses: &[Clause]) -> Vec<TodoRecord> {
        let mut records: Vec<TodoRecord> = self
            .inner
            .iter()
            .filter(|r| matches_all(clauses, r.value()))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| r.id);
        records
    }

    fn page_of(&self, page: PageRequest, clauses: &[Clause]) -> RecordPage {
        let matching = self.sorted_matching(clauses);
        let total_count = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let count = usize::try_from(page.count).unwrap_or(usize::MAX);

        RecordPage {
            records: matching.into_iter().skip(offset).take(count).collect(),
            total_count,
        }
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn get_todo(&self, id: &str) -> StoreResult<TodoRecord> {
        let not_found = || StoreError::NotFound { id: id.to_string() };
        let key: u64 = id.trim().parse().map_err(|_| not_found())?;
        self.inner
            .get(&key)
            .map(|r| r.value().clone())
            .ok_or_else(not_found)
    }

    async fn pages(&self, page: PageRequest) -> StoreResult<RecordPage> {
        Ok(self.page_of(page, &[]))
    }

    async fn search(&self, page: PageRequest, clauses: &[Clause]) -> StoreResult<RecordPage> {
        Ok(self.page_of(page, clauses))
    }

    async fn create(&self, mut record: TodoRecord) -> StoreResult<TodoRecord> {
        let now = Utc::now();
        record.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record.created_at = now;
        record.updated_at = now;

        self.inner.insert(record.id, record.clone());
        tracing::debug!(id = record.id, "Inserted todo");
        Ok(record)
    }

    async fn save(&self, mut record: TodoRecord) -> StoreResult<()> {
        match self.inner.get_mut(&record.id) {
            Some(mut entry) => {
                record.updated_at = Utc::now();
                *entry = record;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                id: record.id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn draft(code: &str) -> TodoRecord {
        let at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        TodoRecord {
            id: 999,
            content_code: code.to_string(),
            content_name: format!("{} name", code),
            description: String::new(),
            start_date: at,
            end_date: at,
            status: "ACTIVE".to_string(),
            created_at: at,
            updated_at: at,
            created_by: "seed".to_string(),
            updated_by: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let store = MemoryStore::default();
        let before = Utc::now();
        let first = store.create(draft("A")).await.unwrap();
        let second = store.create(draft("B")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.created_at >= before);
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_get_unknown_or_malformed_id() {
        let store = MemoryStore::default();
        store.create(draft("A")).await.unwrap();

        assert!(matches!(store.get_todo("2").await, Err(StoreError::NotFound { .. })));
        assert!(matches!(store.get_todo("abc").await, Err(StoreError::NotFound { .. })));
        assert_eq!(store.get_todo("1").await.unwrap().content_code, "A");
    }

    #[tokio::test]
    async fn test_pages_ordered_by_id() {
        let store = MemoryStore::default();
        for i in 0..25 {
            store.create(draft(&format!("C{}", i))).await.unwrap();
        }

        let page = store.pages(PageRequest { count: 10, page: 2 }).await.unwrap();
        assert_eq!(page.total_count, 25);
        let ids: Vec<u64> = page.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, (11..=20).collect::<Vec<_>>());

        let last = store.pages(PageRequest { count: 10, page: 3 }).await.unwrap();
        assert_eq!(last.records.len(), 5);

        let beyond = store.pages(PageRequest { count: 10, page: 9 }).await.unwrap();
        assert!(beyond.records.is_empty());
        assert_eq!(beyond.total_count, 25);
    }

    #[tokio::test]
    async fn test_save_overwrites_and_stamps_updated_at() {
        let store = MemoryStore::default();
        let created = store.create(draft("A")).await.unwrap();

        let mut changed = created.clone();
        changed.description = "new".to_string();
        store.save(changed).await.unwrap();

        let stored = store.get_todo("1").await.unwrap();
        assert_eq!(stored.description, "new");
        assert!(stored.updated_at >= created.updated_at);
        assert_eq!(stored.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_save_unknown_id_fails() {
        let store = MemoryStore::default();
        let mut record = draft("A");
        record.id = 77;
        assert!(matches!(store.save(record).await, Err(StoreError::NotFound { .. })));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");

        let store = MemoryStore::new(Some(path.clone()));
        store.create(draft("A")).await.unwrap();
        store.create(draft("B")).await.unwrap();
        store.save_to_file().unwrap();

        let loaded = MemoryStore::load_from_file(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get_todo("2").await.unwrap().content_code, "B");

        let next = loaded.create(draft("C")).await.unwrap();
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn test_with_records_keeps_ids() {
        let mut a = draft("A");
        a.id = 4;
        let mut b = draft("B");
        b.id = 9;
        let store = MemoryStore::with_records(vec![a.clone(), b], None);

        assert_eq!(store.get_todo("4").await.unwrap(), a);
        assert_eq!(store.create(draft("C")).await.unwrap().id, 10);
    }

    #[tokio::test]
    async fn test_save_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        std::fs::write(&path, "[]").unwrap();

        let store = MemoryStore::load_from_file(&path).unwrap();
        store.create(draft("A")).await.unwrap();
        store.save_to_file().unwrap();
        store.create(draft("B")).await.unwrap();
        store.save_to_file().unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(MemoryStore::load_from_file(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_save_into_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(Some(dir.path().join("missing").join("todos.json")));
        assert!(matches!(store.save_to_file(), Err(StoreError::Io(_))));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::load_from_file(dir.path().join("absent.json")).unwrap();
        assert!(store.is_empty());
    }
}
