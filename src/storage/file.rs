//! File-backed key-value store.
//!
//! Entries are served from memory and persisted as a single JSON snapshot,
//! `<directory>/kv.json`, shaped `{"last_id": <u64 | null>, "entries": {..}}`.
//! The snapshot is loaded by `open` and rewritten by `flush` and `close`. A
//! snapshot is written to a temporary file first and renamed into place, so a
//! crash mid-write leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::storage::traits::{KeyFilter, KeyValueStore, StorageError, StorageResult, Visit};

const SNAPSHOT_FILE: &str = "kv.json";
const SNAPSHOT_TEMP_FILE: &str = "kv.json.tmp";

#[derive(Debug, Default, Deserialize)]
struct Snapshot {
    last_id: Option<u64>,
    entries: BTreeMap<String, String>,
}

/// A persistent store rooted in a directory.
#[derive(Debug)]
pub struct FileStore {
    /// The root directory for storage.
    directory: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
    next_id: AtomicU64,
    open: AtomicBool,
    /// Serializes snapshot writers.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a closed store for `directory`. Nothing is read until `open`.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        FileStore {
            directory: directory.as_ref().to_path_buf(),
            entries: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(0),
            open: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn snapshot_path(&self) -> PathBuf {
        self.directory.join(SNAPSHOT_FILE)
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StorageError::Closed)
        }
    }

    /// Write the current state to disk.
    pub async fn flush(&self) -> StorageResult<()> {
        self.ensure_open()?;
        self.write_snapshot().await
    }

    async fn write_snapshot(&self) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;

        let bytes = {
            let next_id = self.next_id.load(Ordering::SeqCst);
            let entries = self.entries.read();
            let snapshot = SnapshotRef {
                last_id: next_id.checked_sub(1),
                entries: &entries,
            };
            serde_json::to_vec(&snapshot).map_err(|e| StorageError::Corrupt(e.to_string()))?
        };

        let temp_path = self.directory.join(SNAPSHOT_TEMP_FILE);
        tokio::fs::write(&temp_path, &bytes).await?;
        tokio::fs::rename(&temp_path, self.snapshot_path()).await?;
        debug!(
            "wrote snapshot of {} bytes to {}",
            bytes.len(),
            self.directory.display()
        );
        Ok(())
    }

    async fn read_snapshot(&self) -> StorageResult<Snapshot> {
        let path = self.snapshot_path();
        if !tokio::fs::try_exists(&path).await? {
            return Ok(Snapshot::default());
        }
        let bytes = tokio::fs::read(&path).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::Corrupt(format!("{}: {e}", path.display()))
        })
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    last_id: Option<u64>,
    entries: &'a BTreeMap<String, String>,
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn open(&self) -> StorageResult<()> {
        if self.open.load(Ordering::Acquire) {
            return Ok(());
        }
        tokio::fs::create_dir_all(&self.directory).await?;

        let snapshot = self.read_snapshot().await?;
        debug!(
            "opened {} with {} entries",
            self.directory.display(),
            snapshot.entries.len()
        );
        self.next_id
            .store(snapshot.last_id.map_or(0, |id| id + 1), Ordering::SeqCst);
        *self.entries.write() = snapshot.entries;
        self.open.store(true, Ordering::Release);
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        if !self.open.load(Ordering::Acquire) {
            return Ok(());
        }
        self.write_snapshot().await?;
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
