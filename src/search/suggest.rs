//! Suggestions.
//!
//! A document contributes a suggestion for a field when it has a token record
//! for the literal suggestion text in that field. SUGGEST fields index every
//! prefix of their lowercased value, so a typed prefix finds the documents
//! whose value starts with it; the suggestion is the field's original value.

use futures::future::join_all;

use crate::analysis::field_type::render_value;
use crate::bitset::DocId;
use crate::error::BitsearchError;
use crate::index::{DocumentStore, InvertedIndex};
use crate::query::SuggestSpec;

/// The `(field, suggestion)` pairs document `id` contributes, in the order
/// of `spec.fields`.
pub async fn document_suggestions(
    index: &InvertedIndex,
    documents: &DocumentStore,
    id: DocId,
    spec: &SuggestSpec,
) -> (Vec<(String, String)>, Vec<BitsearchError>) {
    let mut errors = Vec::new();
    let tokens = join_all(
        spec.fields
            .iter()
            .map(|field| index.get_token(id, field, &spec.text)),
    )
    .await;

    let mut matching = Vec::new();
    for (field, token) in spec.fields.iter().zip(tokens) {
        match token {
            Ok(Some(_)) => matching.push(field),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }
    if matching.is_empty() {
        return (Vec::new(), errors);
    }

    let source = match documents.load(id).await {
        Ok(Some(source)) => source,
        Ok(None) => {
            errors.push(BitsearchError::not_found(format!("document {id}")));
            return (Vec::new(), errors);
        }
        Err(e) => {
            errors.push(e);
            return (Vec::new(), errors);
        }
    };

    let suggestions = matching
        .into_iter()
        .filter_map(|field| {
            source
                .get(field)
                .and_then(render_value)
                .map(|text| (field.clone(), text))
        })
        .collect();
    (suggestions, errors)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::analysis::field_type::FieldType;
    use crate::analysis::token::Term;
    use crate::config::KeyLayout;
    use crate::index::{Document, Keys};
    use crate::storage::{KeyValueStore, MemoryStore};

    async fn setup(description: &str) -> (InvertedIndex, DocumentStore, DocId) {
        let store = Arc::new(MemoryStore::new());
        store.open().await.unwrap();
        let keys = Keys::new(KeyLayout::default());
        let index = InvertedIndex::new(store.clone(), keys.clone());
        let documents = DocumentStore::new(store, keys);

        let mut document = Document::new();
        document.insert("description".to_string(), json!(description));
        let id = documents.save(&document).await.unwrap();
        for token in FieldType::Suggest.pipeline().analyze(description).unwrap() {
            index.add_posting(&Term::new("description", token), id).await.unwrap();
        }
        (index, documents, id)
    }

    fn spec(text: &str) -> SuggestSpec {
        SuggestSpec {
            text: text.to_string(),
            fields: vec!["description".to_string(), "title".to_string()],
        }
    }

    #[tokio::test]
    async fn test_prefix_yields_original_value() {
        let (index, documents, id) = setup("Hello moon").await;
        let (suggestions, errors) = document_suggestions(&index, &documents, id, &spec("hel")).await;
        assert!(errors.is_empty());
        assert_eq!(
            suggestions,
            vec![("description".to_string(), "Hello moon".to_string())]
        );
    }

    #[tokio::test]
    async fn test_text_is_not_analyzed() {
        let (index, documents, id) = setup("Hello moon").await;
        let (suggestions, _) = document_suggestions(&index, &documents, id, &spec("Hel")).await;
        assert!(suggestions.is_empty());
        let (suggestions, _) = document_suggestions(&index, &documents, id, &spec("moo")).await;
        assert!(suggestions.is_empty());
    }
}
