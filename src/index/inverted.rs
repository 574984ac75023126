//! Inverted index over the key-value store.
//!
//! Every registered term updates four records: the global postings, the
//! field postings, the exact term postings, and the token record that keeps
//! the analyzed token (with its offsets) for that document. The three bitset
//! updates are read-modify-write cycles guarded by [`KeyLocks`]. Every index
//! over the same store shares one lock table, so concurrent indexing of
//! documents sharing terms never loses an update within a process.

use std::sync::Arc;

use futures::join;
use log::{debug, warn};

use crate::analysis::token::{Term, Token};
use crate::bitset::{BitSet, DocId};
use crate::error::{BitsearchError, Result};
use crate::index::keys::Keys;
use crate::index::locks::KeyLocks;
use crate::storage::{KeyValueStore, StorageError};

fn decode_bitset(key: &str, raw: &str) -> Result<BitSet> {
    serde_json::from_str(raw).map_err(|e| {
        BitsearchError::Storage(StorageError::Corrupt(format!("posting '{key}': {e}")))
    })
}

/// Keep the first error of several independent outcomes.
fn first_error<I: IntoIterator<Item = Result<()>>>(results: I) -> Result<()> {
    results.into_iter().find(|r| r.is_err()).unwrap_or(Ok(()))
}

/// Term postings, token records and document boosts.
#[derive(Debug)]
pub struct InvertedIndex {
    store: Arc<dyn KeyValueStore>,
    keys: Keys,
    locks: Arc<KeyLocks>,
}

impl InvertedIndex {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: Keys) -> Self {
        InvertedIndex {
            locks: KeyLocks::for_store(&store),
            store,
            keys,
        }
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    async fn read_bitset(&self, key: &str) -> Result<BitSet> {
        match self.store.get(key).await? {
            Some(raw) => decode_bitset(key, &raw),
            None => Ok(BitSet::new()),
        }
    }

    /// Apply `update` to the bitset under `key` while holding its lock.
    /// A bitset left empty is deleted rather than stored.
    ///
    /// The guard is dropped before this returns. Callers join several of
    /// these whose keys may share a stripe, so never call it with a guard
    /// already held.
    async fn update_bitset<F>(&self, key: &str, update: F) -> Result<()>
    where
        F: FnOnce(&mut BitSet),
    {
        let _guard = self.locks.lock(key).await;
        let mut bitset = self.read_bitset(key).await?;
        update(&mut bitset);
        if bitset.is_empty() {
            self.store.remove(key).await?;
        } else {
            self.store.set(key, serde_json::to_string(&bitset)?).await?;
        }
        Ok(())
    }

    /// Register `term` for `doc`.
    pub async fn add_posting(&self, term: &Term, doc: DocId) -> Result<()> {
        let all_key = self.keys.all_postings();
        let field_key = self.keys.field_postings(&term.field);
        let term_key = self.keys.term_postings(&term.field, term.text());
        let token_key = self.keys.token(doc, &term.field, term.text());
        let token_json = serde_json::to_string(&term.token)?;

        let (all, field, exact, token) = join!(
            self.update_bitset(&all_key, |b| {
                b.add(doc);
            }),
            self.update_bitset(&field_key, |b| {
                b.add(doc);
            }),
            self.update_bitset(&term_key, |b| {
                b.add(doc);
            }),
            async {
                self.store
                    .set(&token_key, token_json)
                    .await
                    .map_err(BitsearchError::from)
            },
        );
        first_error([all, field, exact, token])
    }

    /// Unregister `term` for `doc`.
    ///
    /// The document leaves the exact term postings and loses the token record.
    /// It leaves the field postings once it has no other token in the field,
    /// and the global postings once it has no token at all.
    pub async fn remove_posting(&self, term: &Term, doc: DocId) -> Result<()> {
        let term_key = self.keys.term_postings(&term.field, term.text());
        let token_key = self.keys.token(doc, &term.field, term.text());

        let (exact, token) = join!(
            self.update_bitset(&term_key, |b| {
                b.remove(doc);
            }),
            async {
                self.store
                    .remove(&token_key)
                    .await
                    .map_err(BitsearchError::from)
            },
        );
        first_error([exact, token])?;

        let (in_field, in_document) = self.remaining_tokens(doc, &term.field).await?;
        let field_key = self.keys.field_postings(&term.field);
        let all_key = self.keys.all_postings();
        let (field, all) = join!(
            async {
                if in_field {
                    return Ok(());
                }
                self.update_bitset(&field_key, |b| {
                    b.remove(doc);
                })
                .await
            },
            async {
                if in_document {
                    return Ok(());
                }
                self.update_bitset(&all_key, |b| {
                    b.remove(doc);
                })
                .await
            },
        );
        first_error([field, all])
    }

    /// Whether `doc` still has a token record in `field`, and in any field.
    async fn remaining_tokens(&self, doc: DocId, field: &str) -> Result<(bool, bool)> {
        let document_prefix = self.keys.document_token_prefix(doc);
        let field_prefix = self.keys.field_token_prefix(doc, field);
        let mut in_field = false;
        let mut in_document = false;
        self.store
            .for_each(&|key| key.starts_with(&document_prefix), &mut |key, _| {
                in_document = true;
                in_field |= key.starts_with(&field_prefix);
            })
            .await?;
        Ok((in_field, in_document))
    }

    /// Documents containing `field:text`. A missing posting is empty.
    pub async fn get_postings(&self, field: &str, text: &str) -> Result<BitSet> {
        self.read_bitset(&self.keys.term_postings(field, text)).await
    }

    /// Documents with any term in `field`.
    pub async fn get_field_postings(&self, field: &str) -> Result<BitSet> {
        self.read_bitset(&self.keys.field_postings(field)).await
    }

    /// The token `text` produced for `field` in `doc`, if that term was
    /// registered for the document.
    pub async fn get_token(&self, doc: DocId, field: &str, text: &str) -> Result<Option<Token>> {
        let key = self.keys.token(doc, field, text);
        match self.store.get(&key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw).map_err(|e| {
                BitsearchError::Storage(StorageError::Corrupt(format!("token '{key}': {e}")))
            })?)),
            None => Ok(None),
        }
    }

    /// Remove `doc` from every posting, and delete its token and boost records.
    ///
    /// This scans every posting key in the store, so its cost grows with the
    /// number of distinct terms in the index. Every affected key is attempted;
    /// the first failure is returned.
    pub async fn remove_all_postings(&self, doc: DocId) -> Result<()> {
        let mut posting_keys = Vec::new();
        let mut corrupt = Vec::new();
        let token_prefix = self.keys.document_token_prefix(doc);
        let mut token_keys = Vec::new();

        self.store
            .for_each(
                &|key| self.keys.is_posting(key) || key.starts_with(&token_prefix),
                &mut |key, value| {
                    if key.starts_with(&token_prefix) {
                        token_keys.push(key.to_string());
                        return;
                    }
                    match decode_bitset(key, value) {
                        Ok(bitset) if bitset.contains(doc) => posting_keys.push(key.to_string()),
                        Ok(_) => {}
                        Err(e) => corrupt.push(e),
                    }
                },
            )
            .await?;
        debug!(
            "removing document {doc} from {} postings and {} token records",
            posting_keys.len(),
            token_keys.len()
        );

        let mut results: Vec<Result<()>> = corrupt.into_iter().map(Err).collect();
        for key in &posting_keys {
            results.push(
                self.update_bitset(key, |b| {
                    b.remove(doc);
                })
                .await,
            );
        }
        for key in &token_keys {
            results.push(self.store.remove(key).await.map_err(BitsearchError::from));
        }
        results.push(
            self.store
                .remove(&self.keys.boost(doc))
                .await
                .map_err(BitsearchError::from),
        );

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            warn!("while removing document {doc}: {err}");
        }
        first_error(results)
    }

    /// Every indexed document.
    pub async fn all(&self) -> Result<BitSet> {
        self.read_bitset(&self.keys.all_postings()).await
    }

    /// Every indexed document not in `bitset`.
    pub async fn complement(&self, bitset: &BitSet) -> Result<BitSet> {
        let mut all = self.all().await?;
        all.and_not(bitset);
        Ok(all)
    }

    pub async fn set_document_boost(&self, doc: DocId, boost: f64) -> Result<()> {
        self.store
            .set(&self.keys.boost(doc), serde_json::to_string(&boost)?)
            .await?;
        Ok(())
    }

    /// The stored boost of `doc`, or `None` if none was stored.
    pub async fn get_document_boost(&self, doc: DocId) -> Result<Option<f64>> {
        let key = self.keys.boost(doc);
        match self.store.get(&key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw).map_err(|e| {
                BitsearchError::Storage(StorageError::Corrupt(format!("boost '{key}': {e}")))
            })?)),
            None => Ok(None),
        }
    }

    /// Visit every `(value, postings)` pair of `field`, in ascending value
    /// order. Used for faceting.
    pub async fn for_each_field_value_posting<F>(&self, field: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(&str, &BitSet),
    {
        let prefix = self.keys.field_value_prefix(field);
        let mut raw = Vec::new();
        self.store
            .for_each(&|key| key.starts_with(&prefix), &mut |key, value| {
                raw.push((key.to_string(), value.to_string()))
            })
            .await?;

        for (key, value) in raw {
            let bitset = decode_bitset(&key, &value)?;
            visit(&key[prefix.len()..], &bitset);
        }
        Ok(())
    }
}
