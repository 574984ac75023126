//! Storage abstraction layer.
//!
//! The index is persisted through the [`KeyValueStore`] trait. Two backends are
//! provided: [`MemoryStore`] for tests and ephemeral indexes, and
//! [`FileStore`] for indexes that outlive the process.

pub mod file;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{KeyFilter, KeyValueStore, StorageError, StorageResult, Visit};
