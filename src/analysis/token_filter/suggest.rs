//! Suggestion prefix filter.
//!
//! Expands a token into all of its prefixes so that typing the first few
//! characters of a value finds it. Every prefix keeps the source span.
//!
//! ```
//! use bitsearch::analysis::stage::Stage;
//! use bitsearch::analysis::token_filter::SuggestFilter;
//! use bitsearch::analysis::token::Token;
//!
//! let filter = SuggestFilter::new();
//! let prefixes: Vec<_> = filter
//!     .process(Token::new("hello", 0))
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(prefixes, vec!["he", "hel", "hell", "hello"]);
//! ```

use crate::analysis::stage::Stage;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

const DEFAULT_MIN_PREFIX: usize = 2;

/// A filter that emits prefixes of the token text, measured in characters,
/// from `min_length` up to `max_length` (or the full text) inclusive.
#[derive(Clone, Debug)]
pub struct SuggestFilter {
    min_length: usize,
    max_length: Option<usize>,
}

impl SuggestFilter {
    pub fn new() -> Self {
        SuggestFilter {
            min_length: DEFAULT_MIN_PREFIX,
            max_length: None,
        }
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

impl Default for SuggestFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for SuggestFilter {
    fn process(&self, token: Token) -> Result<TokenStream> {
        // byte index just past each character
        let ends: Vec<usize> = token
            .text
            .char_indices()
            .map(|(i, ch)| i + ch.len_utf8())
            .collect();
        let max = self.max_length.map_or(ends.len(), |m| m.min(ends.len()));
        let min = self.min_length.max(1);

        let prefixes: Vec<Token> = (min..=max)
            .map(|n| token.with_text(&token.text[..ends[n - 1]]))
            .collect();
        Ok(Box::new(prefixes.into_iter()))
    }

    fn name(&self) -> &'static str {
        "suggest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(filter: &SuggestFilter, text: &str) -> Vec<String> {
        filter
            .process(Token::new(text, 0))
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_prefixes_share_span() {
        let filter = SuggestFilter::new();
        let tokens: Vec<Token> = filter.process(Token::new("abc", 5)).unwrap().collect();
        assert_eq!(tokens.len(), 2);
        for token in tokens {
            assert_eq!((token.start, token.stop), (5, 8));
        }
    }

    #[test]
    fn test_short_text_yields_nothing() {
        let filter = SuggestFilter::new();
        assert!(prefixes(&filter, "a").is_empty());
        assert!(prefixes(&filter, "").is_empty());
        assert_eq!(prefixes(&filter, "ab"), vec!["ab"]);
    }

    #[test]
    fn test_bounds() {
        let filter = SuggestFilter::new().with_min_length(3).with_max_length(4);
        assert_eq!(prefixes(&filter, "hello world"), vec!["hel", "hell"]);
    }

    #[test]
    fn test_multibyte() {
        let filter = SuggestFilter::new();
        assert_eq!(prefixes(&filter, "żółw"), vec!["żó", "żół", "żółw"]);
    }
}
