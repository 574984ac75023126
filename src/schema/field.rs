//! Field definitions for the schema.

use crate::analysis::field_type::FieldType;
use crate::config::DEFAULT_FIELD_BOOST;

/// A named field with its analysis type and boost weight.
///
/// Setters take `&mut self` and return it so schema construction reads as a
/// chain:
///
/// ```
/// use bitsearch::analysis::FieldType;
/// use bitsearch::schema::Schema;
///
/// let mut schema = Schema::new();
/// schema.add_field("name").set_type(FieldType::Text).set_boost(0.5);
///
/// let field = schema.get_field("name").unwrap();
/// assert_eq!(field.boost(), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    field_type: FieldType,
    boost: f64,
}

impl Field {
    /// Create an unresolved (AUTO) field with the default boost.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::with_boost(name, DEFAULT_FIELD_BOOST)
    }

    pub fn with_boost<S: Into<String>>(name: S, boost: f64) -> Self {
        Field {
            name: name.into(),
            field_type: FieldType::Auto,
            boost,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn boost(&self) -> f64 {
        self.boost
    }

    pub fn set_type(&mut self, field_type: FieldType) -> &mut Self {
        self.field_type = field_type;
        self
    }

    pub fn set_boost(&mut self, boost: f64) -> &mut Self {
        self.boost = boost;
        self
    }

    /// Put the field back to AUTO so the next indexed value re-detects it.
    pub fn reset_type(&mut self) -> &mut Self {
        self.field_type = FieldType::Auto;
        self
    }

    /// Whether the field still needs its type detected.
    pub fn is_unresolved(&self) -> bool {
        self.field_type.is_auto()
    }
}
