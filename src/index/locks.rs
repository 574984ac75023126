//! Striped per-key write locks.
//!
//! A posting update reads a bitset, modifies it and writes it back. Two
//! updates of the same key must not interleave or one of them is lost, so
//! every update holds the lock of its key's stripe for the whole
//! read-modify-write. Distinct keys usually map to distinct stripes and
//! proceed concurrently.
//!
//! The table has to be shared by everything writing to one store, so indexes
//! obtain it with [`KeyLocks::for_store`], which hands out one table per store
//! instance for the life of the process.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, Weak};

use ahash::AHasher;
use tokio::sync::{Mutex, MutexGuard};

use crate::storage::KeyValueStore;

const DEFAULT_STRIPES: usize = 64;

/// Lock tables of live stores, keyed by the address of the store.
static REGISTRY: LazyLock<parking_lot::Mutex<HashMap<usize, Weak<KeyLocks>>>> =
    LazyLock::new(|| parking_lot::Mutex::new(HashMap::new()));

fn store_address(store: &Arc<dyn KeyValueStore>) -> usize {
    Arc::as_ptr(store).cast::<()>() as usize
}

/// A fixed table of async mutexes selected by key hash.
#[derive(Debug)]
pub struct KeyLocks {
    stripes: Vec<Mutex<()>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::with_stripes(DEFAULT_STRIPES)
    }

    /// Create a table with `count` stripes (at least one).
    pub fn with_stripes(count: usize) -> Self {
        KeyLocks {
            stripes: (0..count.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    /// The lock table shared by every index writing to `store`.
    ///
    /// Clones of one `Arc` get the same table. The entry lives as long as some
    /// index holds the table; an index also holds the store, so the address
    /// cannot be reused by another store meanwhile.
    pub fn for_store(store: &Arc<dyn KeyValueStore>) -> Arc<KeyLocks> {
        let address = store_address(store);
        let mut registry = REGISTRY.lock();
        if let Some(locks) = registry.get(&address).and_then(Weak::upgrade) {
            return locks;
        }
        registry.retain(|_, locks| locks.strong_count() > 0);
        let locks = Arc::new(KeyLocks::new());
        registry.insert(address, Arc::downgrade(&locks));
        locks
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    /// Index of the stripe guarding `key`. Stable for the life of the table.
    pub fn stripe_of(&self, key: &str) -> usize {
        let mut hasher = AHasher::default();
        key.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }

    /// Wait for and take the lock guarding `key`.
    ///
    /// Callers must not hold one guard while acquiring another: two keys may
    /// share a stripe, and the mutex is not reentrant.
    pub async fn lock(&self, key: &str) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_of(key)].lock().await
    }
}

impl Default for KeyLocks {
    fn default() -> Self {
        Self::new()
    }
}
