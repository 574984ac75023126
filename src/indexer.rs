//! Document ingestion.
//!
//! The [`Indexer`] stores a document body under a fresh id, gives it the
//! default document boost, and runs every field through its pipeline,
//! registering one posting per emitted token. Fields not yet in the schema are
//! added with the default field boost and a type detected from the value.
//!
//! ```
//! use std::sync::Arc;
//!
//! use bitsearch::indexer::IndexerBuilder;
//! use bitsearch::storage::{KeyValueStore, MemoryStore};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! store.open().await.unwrap();
//!
//! let indexer = IndexerBuilder::new().storage(store).build().unwrap();
//! let document = json!({"name": "The Lightning Thief"});
//! let receipt = indexer.add_document(document.as_object().unwrap()).await.unwrap();
//!
//! assert_eq!(receipt.id, 0);
//! assert!(receipt.errors.is_empty());
//! # });
//! ```

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use futures::join;
use log::{debug, info, warn};

use crate::analysis::field_type::{FieldType, render_value};
use crate::analysis::token::Term;
use crate::bitset::DocId;
use crate::config::EngineConfig;
use crate::error::{BitsearchError, Result};
use crate::index::{Document, DocumentStore, InvertedIndex, Keys};
use crate::schema::{Schema, SharedSchema};
use crate::storage::KeyValueStore;

/// A failure that did not stop a document from being indexed.
#[derive(Debug)]
pub struct IndexFailure {
    /// The field being indexed, or `None` for document-level records.
    pub field: Option<String>,
    pub error: BitsearchError,
}

impl fmt::Display for IndexFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "field '{field}': {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Outcome of [`Indexer::add_document`].
#[derive(Debug)]
pub struct IndexReceipt {
    /// The id the document was stored under.
    pub id: DocId,
    /// Partial failures; the document is indexed on a best-effort basis.
    pub errors: Vec<IndexFailure>,
}

impl IndexReceipt {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Builder for [`Indexer`].
#[derive(Default)]
pub struct IndexerBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    schema: Option<SharedSchema>,
}

impl IndexerBuilder {
    pub fn new() -> Self {
        IndexerBuilder::default()
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The store documents and postings are written to. Required.
    pub fn storage(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The schema to use and extend. Defaults to an empty schema.
    pub fn schema(mut self, schema: SharedSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn build(self) -> Result<Indexer> {
        let store = self
            .store
            .ok_or_else(|| BitsearchError::configuration("Storage is required."))?;
        let schema = self.schema.unwrap_or_else(|| {
            Schema::with_default_boost(self.config.default_field_boost).into_shared()
        });
        let keys = Keys::new(self.config.keys.clone());

        Ok(Indexer {
            documents: DocumentStore::new(Arc::clone(&store), keys.clone()),
            index: Arc::new(InvertedIndex::new(store, keys)),
            schema,
            config: self.config,
        })
    }
}

/// Adds and removes documents.
pub struct Indexer {
    config: EngineConfig,
    schema: SharedSchema,
    documents: DocumentStore,
    index: Arc<InvertedIndex>,
}

impl Indexer {
    pub fn builder() -> IndexerBuilder {
        IndexerBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The schema this indexer resolves and extends.
    pub fn schema(&self) -> SharedSchema {
        Arc::clone(&self.schema)
    }

    pub fn index(&self) -> Arc<InvertedIndex> {
        Arc::clone(&self.index)
    }

    /// Resolve the type of `name`, creating the field or detecting its type
    /// from `value` when needed.
    fn resolve_field_type(&self, name: &str, value: &serde_json::Value) -> FieldType {
        let mut schema = self.schema.write();
        let field = schema.add_field(name);
        if field.is_unresolved() {
            let detected = FieldType::detect(value);
            debug!("field '{name}' resolved to {detected}");
            field.set_type(detected);
        }
        field.field_type().clone()
    }

    async fn index_field(&self, id: DocId, name: &str, value: &serde_json::Value) -> Vec<BitsearchError> {
        let Some(text) = render_value(value) else {
            return Vec::new();
        };
        let field_type = self.resolve_field_type(name, value);
        let tokens = match field_type.pipeline().analyze(&text) {
            Ok(tokens) => tokens,
            Err(e) => return vec![e],
        };

        let terms: Vec<Term> = tokens.into_iter().map(|t| Term::new(name, t)).collect();
        join_all(terms.iter().map(|term| self.index.add_posting(term, id)))
            .await
            .into_iter()
            .filter_map(|r| r.err())
            .collect()
    }

    /// Index `document`. Failing to store the body is an error; failures
    /// while indexing individual fields are collected in the receipt.
    pub async fn add_document(&self, document: &Document) -> Result<IndexReceipt> {
        let id = self.documents.save(document).await?;
        let mut errors = Vec::new();

        if let Err(error) = self
            .index
            .set_document_boost(id, self.config.default_document_boost)
            .await
        {
            errors.push(IndexFailure { field: None, error });
        }

        for (name, value) in document {
            for error in self.index_field(id, name, value).await {
                warn!("document {id}, field '{name}': {error}");
                errors.push(IndexFailure {
                    field: Some(name.clone()),
                    error,
                });
            }
        }

        info!(
            "indexed document {id} ({} fields, {} errors)",
            document.len(),
            errors.len()
        );
        Ok(IndexReceipt { id, errors })
    }

    /// Index several documents concurrently. Results are in input order.
    pub async fn add_documents(&self, documents: &[Document]) -> Vec<Result<IndexReceipt>> {
        join_all(documents.iter().map(|document| self.add_document(document))).await
    }

    /// Delete the body of `id` and remove it from every posting.
    pub async fn remove_document(&self, id: DocId) -> Result<()> {
        let (body, postings) = join!(
            self.documents.remove(id),
            self.index.remove_all_postings(id)
        );
        body?;
        postings?;
        info!("removed document {id}");
        Ok(())
    }

    /// Replace document `id` by `document`. Documents are immutable, so the
    /// replacement gets a new id.
    pub async fn replace_document(&self, id: DocId, document: &Document) -> Result<IndexReceipt> {
        self.remove_document(id).await?;
        self.add_document(document).await
    }

    pub async fn set_document_boost(&self, id: DocId, boost: f64) -> Result<()> {
        self.index.set_document_boost(id, boost).await
    }
}

impl fmt::Debug for Indexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indexer")
            .field("config", &self.config)
            .field("schema", &*self.schema.read())
            .finish()
    }
}
