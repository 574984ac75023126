//! Facet counting.
//!
//! A facet of a field maps each exact indexed value of that field to the
//! number of matched documents carrying it.

use std::collections::BTreeMap;

use crate::bitset::BitSet;
use crate::error::Result;
use crate::index::InvertedIndex;

/// Value to matched-document count for one field.
pub type FacetCounts = BTreeMap<String, usize>;

/// Count the values of `field` over `matched`. Values with no matched
/// document are left out.
pub async fn count_facets(index: &InvertedIndex, field: &str, matched: &BitSet) -> Result<FacetCounts> {
    let mut counts = FacetCounts::new();
    index
        .for_each_field_value_posting(field, |value, postings| {
            let mut hits = postings.clone();
            hits.and(matched);
            if !hits.is_empty() {
                counts.insert(value.to_string(), hits.len());
            }
        })
        .await?;
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::token::{Term, Token};
    use crate::config::KeyLayout;
    use crate::index::Keys;
    use crate::storage::{KeyValueStore, MemoryStore};

    async fn index() -> InvertedIndex {
        let store = Arc::new(MemoryStore::new());
        store.open().await.unwrap();
        let index = InvertedIndex::new(store, Keys::new(KeyLayout::default()));
        for (doc, genre) in [(0, "fantasy"), (1, "fantasy"), (2, "IT"), (3, "fantasy")] {
            index
                .add_posting(&Term::new("genre_s", Token::new(genre, 0)), doc)
                .await
                .unwrap();
        }
        index
            .add_posting(&Term::new("genre", Token::new("poetry", 0)), 4)
            .await
            .unwrap();
        index
    }

    #[tokio::test]
    async fn test_counts_over_matched_set() {
        let index = index().await;
        let all = index.all().await.unwrap();
        let counts = count_facets(&index, "genre_s", &all).await.unwrap();
        assert_eq!(counts.get("fantasy"), Some(&3));
        assert_eq!(counts.get("IT"), Some(&1));
        assert_eq!(counts.len(), 2);

        let some: BitSet = [2, 3].into_iter().collect();
        let counts = count_facets(&index, "genre_s", &some).await.unwrap();
        assert_eq!(counts, FacetCounts::from([("IT".to_string(), 1), ("fantasy".to_string(), 1)]));
    }

    #[tokio::test]
    async fn test_zero_counts_are_omitted() {
        let index = index().await;
        let only_it: BitSet = [2].into_iter().collect();
        let counts = count_facets(&index, "genre_s", &only_it).await.unwrap();
        assert_eq!(counts.keys().collect::<Vec<_>>(), vec!["IT"]);
        assert!(count_facets(&index, "missing", &only_it).await.unwrap().is_empty());
    }
}
