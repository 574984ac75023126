//! JSON form of queries.
//!
//! A node is an object with a single operator key mapping to its clauses; a
//! leaf is a single-entry object `{field: value}`. The root object also
//! carries the query parameters:
//!
//! ```json
//! {
//!   "AND": [{"sequence_i": 1}, {"NOT": [{"OR": [{"inStock": false}]}]}],
//!   "boost": 0.5,
//!   "paging": {"offset": 0, "limit": 100},
//!   "facets": ["genre_s"],
//!   "highlight": ["name"],
//!   "highlightTags": ["<u>", "</u>"],
//!   "suggest": {"text": "hel", "fields": ["description"]}
//! }
//! ```

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::config::HighlightTags;
use crate::error::{BitsearchError, Result};
use crate::query::query::{Clause, Operator, Paging, Query, QueryNode, SuggestSpec};

const BOOST: &str = "boost";
const PAGING: &str = "paging";
const FACETS: &str = "facets";
const HIGHLIGHT: &str = "highlight";
const HIGHLIGHT_TAGS: &str = "highlightTags";
const SUGGEST: &str = "suggest";

const ROOT_PARAMETERS: [&str; 6] = [BOOST, PAGING, FACETS, HIGHLIGHT, HIGHLIGHT_TAGS, SUGGEST];

impl QueryNode {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.write_json(&mut map);
        Value::Object(map)
    }

    fn write_json(&self, map: &mut Map<String, Value>) {
        let clauses = self
            .clauses
            .iter()
            .map(|clause| match clause {
                Clause::Term { field, value } => {
                    let mut term = Map::new();
                    term.insert(field.clone(), value.clone());
                    Value::Object(term)
                }
                Clause::Node(node) => node.to_json(),
            })
            .collect();
        map.insert(self.operator.as_str().to_string(), Value::Array(clauses));
    }

    pub fn from_json(value: &Value) -> Result<QueryNode> {
        let map = value
            .as_object()
            .ok_or_else(|| BitsearchError::query(format!("query node must be an object: {value}")))?;
        if map.len() != 1 {
            return Err(BitsearchError::query(format!(
                "query node must have exactly one operator key: {value}"
            )));
        }
        node_from_map(map)?.ok_or_else(|| {
            BitsearchError::query(format!("query node has no AND, OR or NOT key: {value}"))
        })
    }
}

/// Read the operator entry of `map`, if it has one.
fn node_from_map(map: &Map<String, Value>) -> Result<Option<QueryNode>> {
    let mut found = None;
    for (key, value) in map {
        let Some(operator) = Operator::parse(key) else {
            continue;
        };
        if found.is_some() {
            return Err(BitsearchError::query(
                "query node has more than one operator key",
            ));
        }
        found = Some((operator, value));
    }

    let Some((operator, clauses)) = found else {
        return Ok(None);
    };
    let clauses = clauses.as_array().ok_or_else(|| {
        BitsearchError::query(format!("clauses of {operator} must be an array"))
    })?;

    let mut node = QueryNode::new(operator);
    for clause in clauses {
        node.clauses.push(clause_from_json(clause)?);
    }
    Ok(Some(node))
}

fn clause_from_json(value: &Value) -> Result<Clause> {
    let map = value
        .as_object()
        .ok_or_else(|| BitsearchError::query(format!("clause must be an object: {value}")))?;
    if map.len() != 1 {
        return Err(BitsearchError::query(format!(
            "clause must have exactly one key: {value}"
        )));
    }
    if let Some(node) = node_from_map(map)? {
        return Ok(Clause::Node(node));
    }
    match map.iter().next() {
        Some((field, value)) => Ok(Clause::term(field.clone(), value.clone())),
        None => Err(BitsearchError::query("empty clause")),
    }
}

fn parameter<T: serde::de::DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Result<Option<T>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| BitsearchError::query(format!("invalid '{key}': {e}"))),
    }
}

impl Query {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(boost) = self.boost {
            map.insert(BOOST.to_string(), json!(boost));
        }
        if let Some(paging) = self.paging {
            map.insert(
                PAGING.to_string(),
                json!({"offset": paging.offset, "limit": paging.limit}),
            );
        }
        if !self.facets.is_empty() {
            map.insert(FACETS.to_string(), json!(self.facets));
        }
        if !self.highlight.is_empty() {
            map.insert(HIGHLIGHT.to_string(), json!(self.highlight));
        }
        if let Some(tags) = &self.highlight_tags {
            map.insert(HIGHLIGHT_TAGS.to_string(), json!([tags.start, tags.end]));
        }
        if let Some(suggest) = &self.suggest {
            map.insert(
                SUGGEST.to_string(),
                json!({"text": suggest.text, "fields": suggest.fields}),
            );
        }
        self.root.write_json(&mut map);
        Value::Object(map)
    }

    /// Parse the JSON form. A root without an operator key is an empty AND.
    pub fn from_json(value: &Value) -> Result<Query> {
        let map = value
            .as_object()
            .ok_or_else(|| BitsearchError::query(format!("query must be an object: {value}")))?;

        if let Some(key) = map
            .keys()
            .find(|k| Operator::parse(k).is_none() && !ROOT_PARAMETERS.contains(&k.as_str()))
        {
            return Err(BitsearchError::query(format!("unknown query key '{key}'")));
        }

        let highlight_tags = parameter::<Vec<String>>(map, HIGHLIGHT_TAGS)?
            .map(|tags| match tags.as_slice() {
                [start, end] => Ok(HighlightTags::new(start.as_str(), end.as_str())),
                _ => Err(BitsearchError::query(
                    "'highlightTags' must be a [start, end] pair",
                )),
            })
            .transpose()?;

        Ok(Query {
            root: node_from_map(map)?.unwrap_or_default(),
            boost: parameter(map, BOOST)?,
            paging: parameter::<Paging>(map, PAGING)?,
            facets: parameter(map, FACETS)?.unwrap_or_default(),
            highlight: parameter(map, HIGHLIGHT)?.unwrap_or_default(),
            highlight_tags,
            suggest: parameter::<SuggestSpec>(map, SUGGEST)?,
        })
    }

    pub fn from_json_str(s: &str) -> Result<Query> {
        let value: Value = serde_json::from_str(s)?;
        Query::from_json(&value)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Query {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Query::from_json(&value).map_err(de::Error::custom)
    }
}
