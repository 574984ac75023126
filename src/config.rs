//! Engine configuration.
//!
//! [`EngineConfig`] is held by value in every [`Indexer`](crate::indexer::Indexer)
//! and [`Searcher`](crate::search::Searcher); there is no process-wide state.
//! Every field has a default, so a JSON file only needs the keys it overrides.
//!
//! ```
//! use bitsearch::config::{EngineConfig, TermOperation};
//!
//! let config = EngineConfig::from_json_str(r#"{"default_limit": 25}"#).unwrap();
//! assert_eq!(config.default_limit, 25);
//! assert_eq!(config.default_term_operation, TermOperation::And);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default paging offset.
pub const DEFAULT_OFFSET: usize = 0;

/// Default paging limit.
pub const DEFAULT_LIMIT: usize = 10;

/// Default boost multiplier stored for every newly indexed document.
pub const DEFAULT_DOCUMENT_BOOST: f64 = 0.5;

/// Default boost weight of a field created without an explicit boost.
pub const DEFAULT_FIELD_BOOST: f64 = 0.1;

/// Default highlight start tag.
pub const DEFAULT_HIGHLIGHT_START: &str = "<b>";

/// Default highlight end tag.
pub const DEFAULT_HIGHLIGHT_END: &str = "</b>";

/// How the postings of several tokens produced from one query value combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TermOperation {
    /// Every token must be present.
    #[default]
    And,
    /// Any token suffices.
    Or,
}

/// Direction in which candidates are ordered by score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Lowest score first.
    #[default]
    Ascending,
    /// Highest score first.
    Descending,
}

/// Pair of tags spliced around highlighted spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightTags {
    pub start: String,
    pub end: String,
}

impl HighlightTags {
    pub fn new<S: Into<String>, E: Into<String>>(start: S, end: E) -> Self {
        HighlightTags {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl Default for HighlightTags {
    fn default() -> Self {
        HighlightTags::new(DEFAULT_HIGHLIGHT_START, DEFAULT_HIGHLIGHT_END)
    }
}

/// Prefixes used to lay out records in the key-value substrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyLayout {
    /// Prefix of raw document bodies.
    pub doc_prefix: String,
    /// Prefix of every posting bitset (global, field and term).
    pub term_prefix: String,
    /// Prefix of per-(document, field, text) token records.
    pub token_prefix: String,
    /// Prefix of per-document boost records.
    pub boost_prefix: String,
    /// Separator between key components.
    pub delimiter: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        KeyLayout {
            doc_prefix: "DOC#".to_string(),
            term_prefix: "TERM#".to_string(),
            token_prefix: "TOKEN#".to_string(),
            boost_prefix: "BOOST#".to_string(),
            delimiter: ":".to_string(),
        }
    }
}

/// Configuration shared by the indexer and the searcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Combinator for multi-token query values.
    pub default_term_operation: TermOperation,
    /// Offset used when a query does not set paging.
    pub default_offset: usize,
    /// Limit used when a query does not set paging.
    pub default_limit: usize,
    /// Tags used when a query does not set its own.
    pub highlight_tags: HighlightTags,
    /// Boost stored for each newly indexed document.
    pub default_document_boost: f64,
    /// Boost of fields created on demand during indexing.
    pub default_field_boost: f64,
    /// Direction of the score ordering.
    pub sort_order: SortOrder,
    /// Storage key layout.
    pub keys: KeyLayout,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_term_operation: TermOperation::default(),
            default_offset: DEFAULT_OFFSET,
            default_limit: DEFAULT_LIMIT,
            highlight_tags: HighlightTags::default(),
            default_document_boost: DEFAULT_DOCUMENT_BOOST,
            default_field_boost: DEFAULT_FIELD_BOOST,
            sort_order: SortOrder::default(),
            keys: KeyLayout::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON text; missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Set the multi-token combinator.
    pub fn with_term_operation(mut self, operation: TermOperation) -> Self {
        self.default_term_operation = operation;
        self
    }

    /// Set the score ordering.
    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.default_document_boost, 0.5);
        assert_eq!(config.default_field_boost, 0.1);
        assert_eq!(config.highlight_tags.start, "<b>");
        assert_eq!(config.keys.term_prefix, "TERM#");
        assert_eq!(config.sort_order, SortOrder::Ascending);
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json_str(
            r#"{"default_term_operation": "OR", "keys": {"doc_prefix": "D/"}}"#,
        )
        .unwrap();
        assert_eq!(config.default_term_operation, TermOperation::Or);
        assert_eq!(config.keys.doc_prefix, "D/");
        assert_eq!(config.keys.term_prefix, "TERM#");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sort_order": "descending"}}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.sort_order, SortOrder::Descending);
    }

    #[test]
    fn test_invalid_json() {
        assert!(EngineConfig::from_json_str("{not json").is_err());
    }
}
