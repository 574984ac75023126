//! Error types for the Bitsearch library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`BitsearchError`] enum. Storage backends report their own
//! [`StorageError`](crate::storage::StorageError), which converts into
//! [`BitsearchError::Storage`].
//!
//! # Examples
//!
//! ```
//! use bitsearch::error::{BitsearchError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(BitsearchError::configuration("Storage is required."))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

use crate::storage::StorageError;

/// The main error type for Bitsearch operations.
#[derive(Error, Debug)]
pub enum BitsearchError {
    /// A required collaborator was missing when a component was built.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Key-value substrate failures.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Analysis-related errors (unresolved field type, bad pipeline, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Schema-related errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// Query-related errors (malformed JSON shape, bad operator, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// A record that should exist was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with BitsearchError.
pub type Result<T> = std::result::Result<T, BitsearchError>;

impl BitsearchError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        BitsearchError::Configuration(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        BitsearchError::Analysis(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        BitsearchError::Schema(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        BitsearchError::Query(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        BitsearchError::NotFound(msg.into())
    }

    /// Create a new storage error carrying a backend message.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        BitsearchError::Storage(StorageError::Backend(msg.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = BitsearchError::configuration("Storage is required.");
        assert_eq!(
            error.to_string(),
            "Configuration error: Storage is required."
        );

        let error = BitsearchError::analysis("unresolved type");
        assert_eq!(error.to_string(), "Analysis error: unresolved type");

        let error = BitsearchError::storage("disk full");
        assert_eq!(error.to_string(), "Storage error: Backend failure: disk full");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = BitsearchError::from(io_error);

        match error {
            BitsearchError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_storage_error_conversion() {
        let error: BitsearchError = StorageError::Closed.into();
        assert!(matches!(error, BitsearchError::Storage(StorageError::Closed)));
    }
}
