//! # Bitsearch
//!
//! A schema-driven document indexing and retrieval library over a pluggable
//! key-value store.
//!
//! ## Features
//!
//! - Text analysis pipelines with branching stages
//! - Posting lists as sparse bitsets
//! - Boolean AND/OR/NOT queries with a fluent builder and a JSON form
//! - Boost-weighted scoring, paging, facets, highlighting and suggestions
//! - In-memory and file-backed stores
//!
//! ```
//! use std::sync::Arc;
//!
//! use bitsearch::prelude::*;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! store.open().await.unwrap();
//!
//! let indexer = Indexer::builder().storage(store.clone()).build().unwrap();
//! let book = json!({"name": "The Lightning Thief", "author": "Rick Riordan"});
//! indexer.add_document(book.as_object().unwrap()).await.unwrap();
//!
//! let searcher = Searcher::builder()
//!     .storage(store)
//!     .schema(indexer.schema())
//!     .build()
//!     .unwrap();
//! let query = QueryBuilder::new().or().term("name", "lightning").build();
//! let result = searcher.search(&query).await;
//!
//! assert_eq!(result.total, 1);
//! assert_eq!(result.documents[0].source["author"], "Rick Riordan");
//! # });
//! ```

pub mod analysis;
pub mod bitset;
pub mod config;
pub mod error;
pub mod index;
pub mod indexer;
pub mod query;
pub mod schema;
pub mod search;
pub mod storage;

pub mod prelude {
    pub use crate::analysis::FieldType;
    pub use crate::bitset::{BitSet, DocId};
    pub use crate::config::EngineConfig;
    pub use crate::error::{BitsearchError, Result};
    pub use crate::index::Document;
    pub use crate::indexer::{Indexer, IndexerBuilder};
    pub use crate::query::{Query, QueryBuilder};
    pub use crate::schema::{Schema, SharedSchema};
    pub use crate::search::{SearchResult, Searcher, SearcherBuilder};
    pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
