//! Boolean query model.
//!
//! A [`Query`] is a tree of AND/OR/NOT nodes whose leaves are
//! `(field, value)` predicates, plus root-only parameters for scoring floor,
//! paging, facets, highlighting and suggestions.

pub mod builder;
pub mod json;
#[allow(clippy::module_inception)]
pub mod query;

pub use self::builder::QueryBuilder;
pub use self::query::{Clause, Operator, Paging, Query, QueryNode, SuggestSpec};
