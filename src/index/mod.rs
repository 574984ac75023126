//! Index module.
//!
//! The persistent side of the engine: document bodies ([`DocumentStore`]),
//! postings and token records ([`InvertedIndex`]), and the key layout they
//! share ([`Keys`]).

pub mod documents;
pub mod inverted;
pub mod keys;
pub mod locks;

// Re-export commonly used types
pub use documents::{Document, DocumentStore};
pub use inverted::InvertedIndex;
pub use keys::Keys;
pub use locks::KeyLocks;
