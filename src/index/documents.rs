//! Raw document bodies.

use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value};

use crate::bitset::DocId;
use crate::error::{BitsearchError, Result};
use crate::index::keys::Keys;
use crate::storage::{KeyValueStore, StorageError};

/// A document: field names mapped to arbitrary JSON values.
pub type Document = Map<String, Value>;

/// Persists document bodies under freshly allocated ids.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    store: Arc<dyn KeyValueStore>,
    keys: Keys,
}

impl DocumentStore {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: Keys) -> Self {
        DocumentStore { store, keys }
    }

    /// Store `document` under a new id and return the id.
    pub async fn save(&self, document: &Document) -> Result<DocId> {
        let allocated = self.store.allocate_id().await?;
        let id = DocId::try_from(allocated).map_err(|_| {
            BitsearchError::storage(format!("Document id {allocated} is out of range"))
        })?;
        let body = serde_json::to_string(document)?;
        self.store.set(&self.keys.document(id), body).await?;
        debug!("saved document {id}");
        Ok(id)
    }

    /// Load the body of `id`, if it exists.
    pub async fn load(&self, id: DocId) -> Result<Option<Document>> {
        let Some(body) = self.store.get(&self.keys.document(id)).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<Value>(&body)? {
            Value::Object(document) => Ok(Some(document)),
            other => Err(StorageError::Corrupt(format!(
                "document {id} is not an object: {other}"
            ))
            .into()),
        }
    }

    pub async fn remove(&self, id: DocId) -> Result<()> {
        self.store.remove(&self.keys.document(id)).await?;
        Ok(())
    }
}
