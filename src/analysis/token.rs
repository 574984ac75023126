//! Token and term types for text analysis.
//!
//! A [`Token`] is one unit of analyzed text together with the byte span it
//! came from. A [`Term`] binds a token to the field it was produced for and is
//! the unit registered in the inverted index.
//!
//! ```
//! use bitsearch::analysis::token::{Term, Token};
//!
//! let token = Token::new("world", 6);
//! assert_eq!(token.stop, 11);
//!
//! let term = Term::new("title", token);
//! assert_eq!(term.key(":"), "title:world");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A token represents a single unit of text after analysis.
///
/// `start` and `stop` are byte offsets into the text the pipeline was fed, so
/// the span `start..stop` can be used to splice highlight tags into it.
/// Tokens derived from another token (lowercased, coerced, prefixed) keep the
/// offsets of their source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// Byte offset where the source span starts
    pub start: usize,

    /// Byte offset where the source span ends (exclusive)
    pub stop: usize,
}

impl Token {
    /// Create a token whose span covers exactly its own text.
    pub fn new<S: Into<String>>(text: S, start: usize) -> Self {
        let text = text.into();
        let stop = start + text.len();
        Token { text, start, stop }
    }

    /// Create a token with an explicit span.
    pub fn with_offsets<S: Into<String>>(text: S, start: usize, stop: usize) -> Self {
        Token {
            text: text.into(),
            start,
            stop,
        }
    }

    /// Derive a token carrying new text over the same span.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        Token {
            text: text.into(),
            start: self.start,
            stop: self.stop,
        }
    }

    /// Get the length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens emitted by one stage.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;

/// A token bound to a field name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub field: String,
    pub token: Token,
}

impl Term {
    pub fn new<S: Into<String>>(field: S, token: Token) -> Self {
        Term {
            field: field.into(),
            token,
        }
    }

    /// The canonical `field<delimiter>text` form.
    pub fn key(&self, delimiter: &str) -> String {
        format!("{}{}{}", self.field, delimiter, self.token.text)
    }

    pub fn text(&self) -> &str {
        &self.token.text
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.token.text)
    }
}
