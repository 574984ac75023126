//! The boolean query tree.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::HighlightTags;

/// Boolean operator of a [`QueryNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// Every child must match.
    And,
    /// Any child may match.
    Or,
    /// Documents matched by none of the children.
    Not,
}

impl Operator {
    /// The JSON key of a node with this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }

    pub fn parse(s: &str) -> Option<Operator> {
        match s {
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            "NOT" => Some(Operator::Not),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One child of a [`QueryNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Leaf predicate: `value` analyzed with the pipeline of `field`.
    Term { field: String, value: Value },
    /// Nested subtree.
    Node(QueryNode),
}

impl Clause {
    pub fn term<S: Into<String>, V: Into<Value>>(field: S, value: V) -> Self {
        Clause::Term {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<QueryNode> for Clause {
    fn from(node: QueryNode) -> Self {
        Clause::Node(node)
    }
}

/// An operator applied to an ordered list of clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryNode {
    pub operator: Operator,
    pub clauses: Vec<Clause>,
}

impl QueryNode {
    pub fn new(operator: Operator) -> Self {
        QueryNode {
            operator,
            clauses: Vec::new(),
        }
    }

    pub fn with_clause<C: Into<Clause>>(mut self, clause: C) -> Self {
        self.clauses.push(clause.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of leaf predicates in this subtree.
    pub fn term_count(&self) -> usize {
        self.clauses
            .iter()
            .map(|clause| match clause {
                Clause::Term { .. } => 1,
                Clause::Node(node) => node.term_count(),
            })
            .sum()
    }
}

impl Default for QueryNode {
    fn default() -> Self {
        QueryNode::new(Operator::And)
    }
}

/// Result window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub offset: usize,
    pub limit: usize,
}

impl Paging {
    pub fn new(offset: usize, limit: usize) -> Self {
        Paging { offset, limit }
    }
}

/// Suggestion request: surface the original values of `fields` in documents
/// that produced `text` as a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestSpec {
    pub text: String,
    pub fields: Vec<String>,
}

/// A complete query: the tree plus the parameters only the root carries.
///
/// Unset parameters fall back to the searcher's
/// [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub root: QueryNode,
    /// Candidates scoring below this are dropped.
    pub boost: Option<f64>,
    pub paging: Option<Paging>,
    pub facets: Vec<String>,
    pub highlight: Vec<String>,
    pub highlight_tags: Option<HighlightTags>,
    pub suggest: Option<SuggestSpec>,
}

impl Query {
    pub fn new(root: QueryNode) -> Self {
        Query {
            root,
            ..Query::default()
        }
    }

    /// A query with no predicates, matching every document.
    pub fn all() -> Self {
        Query::default()
    }

    pub fn builder() -> crate::query::builder::QueryBuilder {
        crate::query::builder::QueryBuilder::new()
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_paging(mut self, offset: usize, limit: usize) -> Self {
        self.paging = Some(Paging::new(offset, limit));
        self
    }

    pub fn with_facets<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_highlight<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlight = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_highlight_tags<S: Into<String>, E: Into<String>>(mut self, start: S, end: E) -> Self {
        self.highlight_tags = Some(HighlightTags::new(start, end));
        self
    }

    pub fn with_suggest<T, I, S>(mut self, text: T, fields: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggest = Some(SuggestSpec {
            text: text.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        });
        self
    }
}
