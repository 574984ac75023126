//! Storage key construction.
//!
//! With the default [`KeyLayout`] the index uses these keys:
//!
//! | Record | Key |
//! |---|---|
//! | every indexed document | `TERM#` |
//! | documents with a term in `field` | `TERM#field` |
//! | documents containing `field:text` | `TERM#field:text` |
//! | token `text` of `field` in `doc` | `TOKEN#doc:field:text` |
//! | boost of `doc` | `BOOST#doc` |
//! | body of `doc` | `DOC#doc` |
//!
//! Every posting key starts with the term prefix, so one prefix scan visits
//! all of them.

use crate::bitset::DocId;
use crate::config::KeyLayout;

/// Builds the storage keys of one index.
#[derive(Clone, Debug, Default)]
pub struct Keys {
    layout: KeyLayout,
}

impl Keys {
    pub fn new(layout: KeyLayout) -> Self {
        Keys { layout }
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    /// Postings of every indexed document.
    pub fn all_postings(&self) -> String {
        self.layout.term_prefix.clone()
    }

    /// Postings of documents with any term in `field`.
    pub fn field_postings(&self, field: &str) -> String {
        format!("{}{}", self.layout.term_prefix, field)
    }

    /// Prefix shared by every `field:text` posting of `field`.
    pub fn field_value_prefix(&self, field: &str) -> String {
        format!("{}{}{}", self.layout.term_prefix, field, self.layout.delimiter)
    }

    /// Postings of documents containing `field:text`.
    pub fn term_postings(&self, field: &str, text: &str) -> String {
        format!("{}{}", self.field_value_prefix(field), text)
    }

    pub fn is_posting(&self, key: &str) -> bool {
        key.starts_with(&self.layout.term_prefix)
    }

    /// Token record of `field:text` in `doc`.
    pub fn token(&self, doc: DocId, field: &str, text: &str) -> String {
        format!("{}{}", self.field_token_prefix(doc, field), text)
    }

    /// Prefix shared by every token record of `field` in `doc`.
    pub fn field_token_prefix(&self, doc: DocId, field: &str) -> String {
        format!(
            "{}{}{}",
            self.document_token_prefix(doc),
            field,
            self.layout.delimiter
        )
    }

    /// Prefix shared by every token record of `doc`.
    pub fn document_token_prefix(&self, doc: DocId) -> String {
        format!("{}{}{}", self.layout.token_prefix, doc, self.layout.delimiter)
    }

    pub fn boost(&self, doc: DocId) -> String {
        format!("{}{}", self.layout.boost_prefix, doc)
    }

    pub fn document(&self, doc: DocId) -> String {
        format!("{}{}", self.layout.doc_prefix, doc)
    }
}
