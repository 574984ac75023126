//! Fluent construction of query trees.
//!
//! The builder keeps a cursor on the node being built. The first of
//! [`and`](QueryBuilder::and), [`or`](QueryBuilder::or) or
//! [`not`](QueryBuilder::not) called on a node fixes its operator; later calls
//! open a child of that operator and move the cursor into it.
//! [`end`](QueryBuilder::end) moves the cursor back to the parent.
//!
//! ```
//! use bitsearch::query::{Clause, Operator, QueryBuilder};
//!
//! let query = QueryBuilder::new()
//!     .and()
//!     .term("sequence_i", 1)
//!     .not()
//!     .or()
//!     .term("inStock", false)
//!     .end()
//!     .end()
//!     .paging(0, 100)
//!     .build();
//!
//! assert_eq!(query.root.operator, Operator::And);
//! assert_eq!(query.root.clauses.len(), 2);
//! assert!(matches!(&query.root.clauses[1], Clause::Node(n) if n.operator == Operator::Not));
//! ```

use serde_json::Value;

use crate::config::HighlightTags;
use crate::query::query::{Clause, Operator, Paging, Query, QueryNode, SuggestSpec};

#[derive(Debug, Default)]
struct Frame {
    operator: Option<Operator>,
    clauses: Vec<Clause>,
}

impl Frame {
    fn into_node(self) -> QueryNode {
        QueryNode {
            operator: self.operator.unwrap_or(Operator::And),
            clauses: self.clauses,
        }
    }
}

/// Builder for [`Query`].
#[derive(Debug)]
pub struct QueryBuilder {
    // stack[0] is the root; the last frame is the cursor.
    stack: Vec<Frame>,
    query: Query,
}

impl QueryBuilder {
    pub fn new() -> Self {
        QueryBuilder {
            stack: vec![Frame::default()],
            query: Query::default(),
        }
    }

    fn cursor(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn operator(mut self, operator: Operator) -> Self {
        let cursor = self.cursor();
        if cursor.operator.is_none() {
            cursor.operator = Some(operator);
        } else {
            self.stack.push(Frame {
                operator: Some(operator),
                clauses: Vec::new(),
            });
        }
        self
    }

    pub fn and(self) -> Self {
        self.operator(Operator::And)
    }

    pub fn or(self) -> Self {
        self.operator(Operator::Or)
    }

    pub fn not(self) -> Self {
        self.operator(Operator::Not)
    }

    /// Append a leaf predicate to the current node.
    pub fn term<S: Into<String>, V: Into<Value>>(mut self, field: S, value: V) -> Self {
        self.cursor().clauses.push(Clause::term(field, value));
        self
    }

    /// Append an already built subtree to the current node.
    pub fn node(mut self, node: QueryNode) -> Self {
        self.cursor().clauses.push(Clause::Node(node));
        self
    }

    /// Close the current node and return to its parent. Does nothing at the
    /// root.
    pub fn end(mut self) -> Self {
        if self.stack.len() > 1 {
            if let Some(frame) = self.stack.pop() {
                self.cursor().clauses.push(Clause::Node(frame.into_node()));
            }
        }
        self
    }

    /// Nesting depth of the cursor; 0 at the root.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.query.boost = Some(boost);
        self
    }

    pub fn paging(mut self, offset: usize, limit: usize) -> Self {
        self.query.paging = Some(Paging::new(offset, limit));
        self
    }

    pub fn facets<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.facets = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn highlight<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.highlight = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn highlight_tags<S: Into<String>, E: Into<String>>(mut self, start: S, end: E) -> Self {
        self.query.highlight_tags = Some(HighlightTags::new(start, end));
        self
    }

    pub fn suggest<T, I, S>(mut self, text: T, fields: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.suggest = Some(SuggestSpec {
            text: text.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Close any open nodes and return the query. A root whose operator was
    /// never set is an AND.
    pub fn build(mut self) -> Query {
        while self.stack.len() > 1 {
            self = self.end();
        }
        let root = self.stack.pop().unwrap_or_default();
        Query {
            root: root.into_node(),
            ..self.query
        }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        QueryBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(clause: &Clause) -> &QueryNode {
        match clause {
            Clause::Node(node) => node,
            Clause::Term { .. } => panic!("expected a node"),
        }
    }

    #[test]
    fn test_first_operator_call_sets_root() {
        let query = QueryBuilder::new().or().term("cat", "book").build();
        assert_eq!(query.root.operator, Operator::Or);
        assert_eq!(query.root.clauses, vec![Clause::term("cat", "book")]);
    }

    #[test]
    fn test_untyped_root_is_and() {
        let query = QueryBuilder::new().term("cat", "book").build();
        assert_eq!(query.root.operator, Operator::And);
    }

    #[test]
    fn test_end_returns_to_parent_not_root() {
        let builder = QueryBuilder::new().and().or().not();
        assert_eq!(builder.depth(), 2);
        let builder = builder.term("inStock", false).end();
        assert_eq!(builder.depth(), 1);
        let query = builder.term("cat", "book").end().term("id", "1").build();

        assert_eq!(query.root.clauses.len(), 2);
        let or = node(&query.root.clauses[0]);
        assert_eq!(or.operator, Operator::Or);
        assert_eq!(or.clauses.len(), 2);
        assert_eq!(node(&or.clauses[0]).operator, Operator::Not);
        assert_eq!(or.clauses[1], Clause::term("cat", "book"));
        assert_eq!(query.root.clauses[1], Clause::term("id", "1"));
    }

    #[test]
    fn test_end_at_root_is_noop() {
        let query = QueryBuilder::new().and().end().end().term("a", "b").build();
        assert_eq!(query.root.clauses, vec![Clause::term("a", "b")]);
    }

    #[test]
    fn test_build_closes_open_nodes() {
        let query = QueryBuilder::new().and().or().term("a", "b").build();
        let or = node(&query.root.clauses[0]);
        assert_eq!(or.clauses, vec![Clause::term("a", "b")]);
    }

    #[test]
    fn test_book_query_shape() {
        let query = QueryBuilder::new()
            .boost(0.5)
            .paging(0, 100)
            .facets(["genre_s", "sequence_i"])
            .highlight_tags("<u>", "</u>")
            .highlight(["name", "author", "cat", "series_t"])
            .suggest("hel", ["description"])
            .and()
            .term("sequence_i", 1)
            .or()
            .term("cat", "book")
            .term("cat", "hardcover")
            .end()
            .not()
            .or()
            .term("inStock", false)
            .end()
            .end()
            .or()
            .term("name", "lightning")
            .term("name", "lucene")
            .term("author", "rick")
            .term("series_t", "jaqkon")
            .end()
            .build();

        assert_eq!(query.root.clauses.len(), 4);
        assert_eq!(query.root.term_count(), 8);
        assert_eq!(node(&query.root.clauses[3]).clauses.len(), 4);
        assert_eq!(query.paging, Some(Paging::new(0, 100)));
        assert_eq!(query.highlight.len(), 4);
    }
}
