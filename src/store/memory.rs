use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use uuid::Uuid;

use super::{Change, Record, Repository, StoreError};

/// In-process [`Repository`] used by tests in place of Postgres.
pub struct MemoryRepository<E> {
    records: Mutex<Vec<E>>,
    calls: AtomicUsize,
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl<E: Record> MemoryRepository<E> {
    /// Number of storage calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of matching records, newest first.
    pub fn select<F>(&self, predicate: F) -> Vec<E>
    where
        F: Fn(&E) -> bool,
    {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().expect("memory store poisoned");
        let mut rows: Vec<E> = records.iter().filter(|r| predicate(r)).cloned().collect();
        rows.sort_by_key(|r| std::cmp::Reverse(r.created_at()));
        rows
    }

    fn conflicts(existing: &[E], candidate: &E) -> Option<String> {
        let keys = candidate.unique_keys();
        existing
            .iter()
            .filter(|r| r.id() != candidate.id())
            .flat_map(|r| r.unique_keys())
            .find(|key| keys.contains(key))
            .map(|(constraint, _)| constraint.to_string())
    }
}

#[async_trait]
impl<E: Record> Repository<E> for MemoryRepository<E> {
    async fn fetch_all(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.select(|_| true))
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        Ok(self.select(|r| r.id() == id).into_iter().next())
    }

    async fn create(&self, record: E) -> Result<E, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().expect("memory store poisoned");
        if let Some(constraint) = Self::conflicts(&records, &record) {
            return Err(StoreError::Conflict(constraint));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, change: Change<E>) -> Result<E, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().expect("memory store poisoned");
        let pos = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound)?;
        let changed = change(records[pos].clone());
        if let Some(constraint) = Self::conflicts(&records, &changed) {
            return Err(StoreError::Conflict(constraint));
        }
        records[pos] = changed.clone();
        Ok(changed)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().expect("memory store poisoned");
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() < before)
    }
}
