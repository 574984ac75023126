//! Lowercase filter implementation.
//!
//! # Examples
//!
//! ```
//! use bitsearch::analysis::stage::Stage;
//! use bitsearch::analysis::token_filter::LowercaseFilter;
//! use bitsearch::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens: Vec<_> = filter.process(Token::new("WORLD", 6)).unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "world");
//! assert_eq!((tokens[0].start, tokens[0].stop), (6, 11));
//! ```

use crate::analysis::stage::{self, Stage};
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// A filter that converts tokens to lowercase.
///
/// Offsets are preserved, so highlighting still points into the original
/// (mixed case) text.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Stage for LowercaseFilter {
    fn process(&self, token: Token) -> Result<TokenStream> {
        let lowered = token.text.to_lowercase();
        stage::one(token.with_text(lowered))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_filter() {
        let filter = LowercaseFilter::new();
        let tokens: Vec<Token> = filter
            .process(Token::new("Hello", 3))
            .unwrap()
            .collect();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[0].start, 3);
        assert_eq!(tokens[0].stop, 8);
    }

    #[test]
    fn test_unicode() {
        let filter = LowercaseFilter::new();
        let tokens: Vec<Token> = filter.process(Token::new("ÀÉÎ", 0)).unwrap().collect();
        assert_eq!(tokens[0].text, "àéî");
    }
}
