//! Schema module.
//!
//! A [`Schema`] maps field names to [`Field`]s: the analysis type a field's
//! values go through and the boost a hit on that field contributes to a score.
//! Fields missing from the schema are added on demand when first indexed.

pub mod field;
#[allow(clippy::module_inception)]
pub mod schema;

// Re-export commonly used types
pub use field::Field;
pub use schema::{Schema, SharedSchema};
