//! In-memory key-value store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::storage::traits::{KeyFilter, KeyValueStore, StorageError, StorageResult, Visit};

/// A store that keeps every entry in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
    next_id: AtomicU64,
    open: AtomicBool,
}

impl MemoryStore {
    /// Create a closed, empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StorageError::Closed)
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn open(&self) -> StorageResult<()> {
        self.open.store(true, Ordering::Release);
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        self.open.store(false, Ordering::Release);
        Ok(())
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.ensure_open()?;
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_open()?;
        Ok(self.entries.read().get(key).cloned())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.ensure_open()?;
        self.entries.write().remove(key);
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        self.ensure_open()?;
        self.entries.write().clear();
        Ok(())
    }

    async fn for_each(&self, filter: KeyFilter<'_>, visit: Visit<'_>) -> StorageResult<()> {
        self.ensure_open()?;
        let entries = self.entries.read();
        for (key, value) in entries.iter() {
            if filter(key.as_str()) {
                visit(key.as_str(), value.as_str());
            }
        }
        Ok(())
    }

    async fn allocate_id(&self) -> StorageResult<u64> {
        self.ensure_open()?;
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}
