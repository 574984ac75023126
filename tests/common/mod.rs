#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bitsearch::analysis::FieldType;
use bitsearch::index::Document;
use bitsearch::indexer::{Indexer, IndexerBuilder};
use bitsearch::schema::{Schema, SharedSchema};
use bitsearch::search::{Searcher, SearcherBuilder};
use bitsearch::storage::{
    KeyFilter, KeyValueStore, MemoryStore, StorageError, StorageResult, Visit,
};
use serde_json::{Value, json};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// The four books, in indexing order.
pub fn books() -> Vec<Document> {
    [
        json!({
            "id": "978-1423103349",
            "cat": ["book", "paperback"],
            "name": "The Sea of Monsters",
            "author": "Rick Riordan",
            "series_t": "Percy Jackson and the Olympians",
            "sequence_i": 2,
            "genre_s": "fantasy",
            "inStock": false,
            "price": 6.49,
            "pages_i": 304,
            "description": "Hello moon"
        }),
        json!({
            "id": "978-1857995879",
            "cat": ["book", "paperback"],
            "name": "Sophie's World : The Greek Philosophers",
            "author": "Jostein Gaarder",
            "sequence_i": 1,
            "genre_s": "fantasy",
            "inStock": true,
            "price": 3.07,
            "pages_i": 64,
            "description": "Hello mars"
        }),
        json!({
            "id": "978-1933988177",
            "cat": ["book", "paperback"],
            "name": "Lucene in Action, Second Edition",
            "author": "Michael McCandless",
            "sequence_i": 1,
            "genre_s": "IT",
            "inStock": true,
            "price": 30.50,
            "pages_i": 475,
            "description": "Hello all"
        }),
        json!({
            "id": "978-0641723445",
            "cat": ["book", "hardcover"],
            "name": "The Lightning Thief",
            "author": "Rick Riordan",
            "series_t": "Percy Jackson and the Olympians",
            "sequence_i": 1,
            "genre_s": "fantasy",
            "inStock": true,
            "price": 12.50,
            "pages_i": 384,
            "description": "Hello world"
        }),
    ]
    .into_iter()
    .map(doc)
    .collect()
}

/// The book schema. Fields not listed are detected while indexing.
pub fn book_schema() -> Schema {
    let mut schema = Schema::new();
    schema.add_field("id").set_type(FieldType::Keyword).set_boost(0.01);
    schema.add_field("cat").set_boost(0.5);
    schema.add_field("name").set_boost(0.5);
    schema.add_field("series_t").set_type(FieldType::Soundex);
    schema
        .add_field("description")
        .set_type(FieldType::Suggest)
        .set_boost(0.8);
    schema
}

/// Index every book, one after the other, so ids follow the list order.
pub async fn index_books(store: Arc<dyn KeyValueStore>, schema: Schema) -> (Indexer, Searcher) {
    let schema: SharedSchema = schema.into_shared();
    let indexer = IndexerBuilder::new()
        .storage(Arc::clone(&store))
        .schema(Arc::clone(&schema))
        .build()
        .unwrap();
    for (expected, book) in books().iter().enumerate() {
        let receipt = indexer.add_document(book).await.unwrap();
        assert_eq!(receipt.id as usize, expected);
        assert!(receipt.is_complete(), "{:?}", receipt.errors);
    }
    let searcher = SearcherBuilder::new()
        .storage(store)
        .schema(schema)
        .build()
        .unwrap();
    (indexer, searcher)
}

pub async fn memory_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.open().await.unwrap();
    store
}

/// A store that fails reads of keys starting with a prefix once armed.
#[derive(Debug)]
pub struct FailingStore {
    inner: MemoryStore,
    prefix: String,
    armed: AtomicBool,
}

impl FailingStore {
    pub async fn new<S: Into<String>>(prefix: S) -> Arc<Self> {
        let store = Arc::new(FailingStore {
            inner: MemoryStore::new(),
            prefix: prefix.into(),
            armed: AtomicBool::new(false),
        });
        store.open().await.unwrap();
        store
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn fails(&self, key: &str) -> bool {
        self.armed.load(Ordering::SeqCst) && key.starts_with(&self.prefix)
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn open(&self) -> StorageResult<()> {
        self.inner.open().await
    }

    async fn close(&self) -> StorageResult<()> {
        self.inner.close().await
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.inner.set(key, value).await
    }

    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fails(key) {
            return Err(StorageError::Backend(format!("read of '{key}' refused")));
        }
        self.inner.get(key).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key).await
    }

    async fn clear(&self) -> StorageResult<()> {
        self.inner.clear().await
    }

    async fn for_each(&self, filter: KeyFilter<'_>, visit: Visit<'_>) -> StorageResult<()> {
        self.inner.for_each(filter, visit).await
    }

    async fn allocate_id(&self) -> StorageResult<u64> {
        self.inner.allocate_id().await
    }
}

/// A store that yields to the scheduler around every read and write, so
/// concurrent read-modify-write cycles interleave unless they are locked.
#[derive(Debug, Default)]
pub struct YieldingStore {
    inner: MemoryStore,
}

impl YieldingStore {
    pub async fn new() -> Arc<Self> {
        let store = Arc::new(YieldingStore::default());
        store.open().await.unwrap();
        store
    }
}

#[async_trait]
impl KeyValueStore for YieldingStore {
    async fn open(&self) -> StorageResult<()> {
        self.inner.open().await
    }

    async fn close(&self) -> StorageResult<()> {
        self.inner.close().await
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        tokio::task::yield_now().await;
        self.inner.set(key, value).await
    }

    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self.inner.get(key).await;
        tokio::task::yield_now().await;
        value
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        tokio::task::yield_now().await;
        self.inner.remove(key).await
    }

    async fn clear(&self) -> StorageResult<()> {
        self.inner.clear().await
    }

    async fn for_each(&self, filter: KeyFilter<'_>, visit: Visit<'_>) -> StorageResult<()> {
        self.inner.for_each(filter, visit).await
    }

    async fn allocate_id(&self) -> StorageResult<u64> {
        self.inner.allocate_id().await
    }
}
