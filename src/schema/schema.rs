//! Schema management for document structure definition.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::DEFAULT_FIELD_BOOST;
use crate::error::{BitsearchError, Result};
use crate::schema::field::Field;

/// A schema shared between an indexer and searchers.
///
/// The indexer extends it with fields it has not seen before, so it sits
/// behind a lock rather than being cloned into each component.
pub type SharedSchema = Arc<RwLock<Schema>>;

/// A schema maps field names to [`Field`]s.
///
/// Lookups are by name; enumeration follows the order fields were added.
#[derive(Clone, Debug)]
pub struct Schema {
    /// Map of field names to their definitions
    fields: HashMap<String, Field>,
    /// Ordered list of field names (for consistent ordering)
    field_names: Vec<String>,
    /// Boost given to fields created without one
    default_boost: f64,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::with_default_boost(DEFAULT_FIELD_BOOST)
    }

    /// Create a new empty schema whose new fields get `default_boost`.
    pub fn with_default_boost(default_boost: f64) -> Self {
        Schema {
            fields: HashMap::new(),
            field_names: Vec::new(),
            default_boost,
        }
    }

    /// Wrap the schema for sharing.
    pub fn into_shared(self) -> SharedSchema {
        Arc::new(RwLock::new(self))
    }

    pub fn default_boost(&self) -> f64 {
        self.default_boost
    }

    /// Add a field, or get the existing one with that name, for configuration.
    pub fn add_field<S: Into<String>>(&mut self, name: S) -> &mut Field {
        let name = name.into();
        if !self.fields.contains_key(&name) {
            self.field_names.push(name.clone());
        }
        let default_boost = self.default_boost;
        self.fields
            .entry(name)
            .or_insert_with_key(|name| Field::with_boost(name.clone(), default_boost))
    }

    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Remove a field from the schema.
    pub fn remove_field(&mut self, name: &str) -> Result<Field> {
        let field = self
            .fields
            .remove(name)
            .ok_or_else(|| BitsearchError::schema(format!("Field '{name}' does not exist")))?;
        self.field_names.retain(|n| n != name);
        Ok(field)
    }

    /// Get all field names in the order they were added.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Iterate fields in the order they were added.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.field_names
            .iter()
            .filter_map(|name| self.fields.get(name))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}
