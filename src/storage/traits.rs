//! Key-value store abstraction and its error type.

use std::fmt::Debug;
use std::io;

use async_trait::async_trait;
use thiserror::Error;

/// Error types specific to storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// An operation was issued before `open` or after `close`.
    #[error("Storage is closed")]
    Closed,

    /// The backend reported a failure.
    #[error("Backend failure: {0}")]
    Backend(String),

    /// I/O error while reading or writing persistent state.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stored data could not be decoded.
    #[error("Corrupt data: {0}")]
    Corrupt(String),
}

/// Result type for store operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Predicate deciding which keys a [`KeyValueStore::for_each`] visits.
pub type KeyFilter<'a> = &'a (dyn Fn(&str) -> bool + Send + Sync);

/// Visitor called with each `(key, value)` pair a scan accepts.
pub type Visit<'a> = &'a mut (dyn FnMut(&str, &str) + Send);

/// The key-value substrate the index is persisted in.
///
/// Keys and values are strings; values written by the index are JSON text.
/// Every method is required, so a backend cannot compile with part of the
/// contract missing. All operations fail with [`StorageError::Closed`] unless
/// the store is open.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Make the store usable, loading any persisted state.
    async fn open(&self) -> StorageResult<()>;

    /// Persist outstanding state and refuse further operations.
    async fn close(&self) -> StorageResult<()>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Get the value under `key`, if any.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Delete every key. Id allocation is not reset.
    async fn clear(&self) -> StorageResult<()>;

    /// Call `visit` for every entry whose key passes `filter`, in ascending
    /// key order.
    async fn for_each(&self, filter: KeyFilter<'_>, visit: Visit<'_>) -> StorageResult<()>;

    /// Atomically allocate the next id. Ids start at 0 and are never reused.
    async fn allocate_id(&self) -> StorageResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        assert_eq!(StorageError::Closed.to_string(), "Storage is closed");
        assert_eq!(
            StorageError::Backend("disk full".to_string()).to_string(),
            "Backend failure: disk full"
        );
        assert_eq!(
            StorageError::Corrupt("bad json".to_string()).to_string(),
            "Corrupt data: bad json"
        );

        let err = StorageError::from(io::Error::other("connection failed"));
        assert_eq!(err.to_string(), "I/O error: connection failed");
    }
}
