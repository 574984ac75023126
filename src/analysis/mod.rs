//! Text analysis module.
//!
//! Values are turned into tokens by [`Pipeline`]s of [`Stage`]s. The same
//! pipeline is used when indexing a field and when querying it, so a query
//! value is tokenized exactly like the stored value it should match.

pub mod field_type;
pub mod pipeline;
pub mod stage;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use field_type::{FieldType, ValueKind, render_value};
pub use pipeline::Pipeline;
pub use stage::Stage;
pub use token::{Term, Token, TokenStream};
