//! Search results.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bitset::DocId;
use crate::error::BitsearchError;
use crate::index::Document;
use crate::query::Paging;

/// The stage of query evaluation an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Search,
    Sorting,
    Facets,
    Documents,
    Highlight,
    Suggest,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Search => "search",
            Phase::Sorting => "sorting",
            Phase::Facets => "facets",
            Phase::Documents => "documents",
            Phase::Highlight => "highlight",
            Phase::Suggest => "suggest",
        };
        f.write_str(name)
    }
}

/// A recoverable failure recorded while evaluating a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchError {
    pub code: String,
    #[serde(rename = "message")]
    pub phase: Phase,
    pub detail: String,
}

impl SearchError {
    pub const CODE: &'static str = "ERROR";

    pub fn new(phase: Phase, error: &BitsearchError) -> Self {
        SearchError {
            code: SearchError::CODE.to_string(),
            phase,
            detail: error.to_string(),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.code, self.phase, self.detail)
    }
}

/// Highlighted variants of one field. A single hit is kept as plain text and
/// turns into a list when a second one arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HighlightValue {
    Text(String),
    List(Vec<String>),
}

impl HighlightValue {
    fn push(&mut self, text: String) {
        match self {
            HighlightValue::Text(first) => {
                *self = HighlightValue::List(vec![std::mem::take(first), text]);
            }
            HighlightValue::List(list) => list.push(text),
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        match self {
            HighlightValue::Text(text) => vec![text.as_str()],
            HighlightValue::List(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

/// One returned document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultDocument {
    #[serde(rename = "_id")]
    pub id: DocId,
    /// Final score.
    #[serde(rename = "_boost")]
    pub boost: f64,
    #[serde(rename = "_source")]
    pub source: Document,
    #[serde(rename = "_highlight", default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<BTreeMap<String, HighlightValue>>,
}

impl SearchResultDocument {
    pub fn new(id: DocId, source: Document, boost: f64) -> Self {
        SearchResultDocument {
            id,
            boost,
            source,
            highlight: None,
        }
    }

    pub fn source_field(&self, name: &str) -> Option<&Value> {
        self.source.get(name)
    }

    pub fn add_highlight<S: Into<String>>(&mut self, field: &str, text: S) -> &mut Self {
        let text = text.into();
        let highlight = self.highlight.get_or_insert_with(BTreeMap::new);
        match highlight.get_mut(field) {
            Some(value) => value.push(text),
            None => {
                highlight.insert(field.to_string(), HighlightValue::Text(text));
            }
        }
        self
    }

    pub fn get_highlight(&self, field: &str) -> Option<&HighlightValue> {
        self.highlight.as_ref().and_then(|h| h.get(field))
    }
}

fn serialize_millis<S: Serializer>(took: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(took.as_millis()).unwrap_or(u64::MAX))
}

/// Outcome of [`Searcher::search`](crate::search::Searcher::search).
///
/// Failures in any phase are collected in `errors`; a result can be partial
/// even when it is returned normally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    #[serde(serialize_with = "serialize_millis")]
    pub took: Duration,
    /// Number of candidates that passed the boost floor.
    pub total: usize,
    #[serde(skip)]
    pub paging: Paging,
    pub documents: Vec<SearchResultDocument>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SearchError>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, BTreeMap<String, usize>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub suggests: BTreeMap<String, Vec<String>>,
}

impl SearchResult {
    pub fn new(paging: Paging) -> Self {
        SearchResult {
            took: Duration::ZERO,
            total: 0,
            paging,
            documents: Vec::new(),
            errors: Vec::new(),
            facets: BTreeMap::new(),
            suggests: BTreeMap::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ids of the returned documents, in result order.
    pub fn ids(&self) -> Vec<DocId> {
        self.documents.iter().map(|d| d.id).collect()
    }

    pub fn set_facet<F: Into<String>, V: Into<String>>(&mut self, field: F, value: V, count: usize) {
        self.facets
            .entry(field.into())
            .or_default()
            .insert(value.into(), count);
    }

    /// Add a suggestion for `field` unless it is already present.
    pub fn add_suggest<S: Into<String>>(&mut self, field: &str, text: S) {
        let text = text.into();
        let suggests = self.suggests.entry(field.to_string()).or_default();
        if !suggests.contains(&text) {
            suggests.push(text);
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_error_json() {
        let error = SearchError::new(Phase::Sorting, &BitsearchError::storage("down"));
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"code": "ERROR", "message": "sorting", "detail": "Storage error: Backend failure: down"})
        );
    }

    #[test]
    fn test_highlight_accumulates() {
        let mut doc = SearchResultDocument::new(3, Document::new(), 0.5);
        doc.add_highlight("name", "<b>a</b> b");
        assert_eq!(
            doc.get_highlight("name"),
            Some(&HighlightValue::Text("<b>a</b> b".to_string()))
        );
        doc.add_highlight("name", "a <b>b</b>");
        assert_eq!(
            doc.get_highlight("name").unwrap().texts(),
            vec!["<b>a</b> b", "a <b>b</b>"]
        );
    }

    #[test]
    fn test_suggests_are_deduplicated() {
        let mut result = SearchResult::new(Paging::new(0, 10));
        result.add_suggest("description", "Hello moon");
        result.add_suggest("description", "Hello moon");
        result.add_suggest("description", "Hello mars");
        assert_eq!(result.suggests["description"], vec!["Hello moon", "Hello mars"]);
    }

    #[test]
    fn test_result_json_shape() {
        let mut result = SearchResult::new(Paging::new(0, 10));
        result.total = 1;
        let mut source = Document::new();
        source.insert("name".to_string(), json!("x"));
        result.documents.push(SearchResultDocument::new(7, source, 0.25));

        let value = result.to_json();
        assert_eq!(value["took"], json!(0));
        assert_eq!(value["total"], json!(1));
        assert_eq!(
            value["documents"],
            json!([{"_id": 7, "_boost": 0.25, "_source": {"name": "x"}}])
        );
        assert!(value.get("errors").is_none());
        assert!(value.get("facets").is_none());
        assert!(value.get("paging").is_none());

        result.set_facet("genre_s", "fantasy", 3);
        assert_eq!(result.to_json()["facets"], json!({"genre_s": {"fantasy": 3}}));
    }
}
