//! Delimiter-based tokenizer implementation.

use std::collections::HashSet;

use crate::analysis::stage::Stage;
use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::split_runs;
use crate::error::Result;

const DEFAULT_DELIMITERS: &[char] = &[' ', '\t', '.', ',', '!', '?', '(', ')', '{', '}'];

/// A tokenizer that splits text on a configurable set of delimiter characters.
///
/// Runs between delimiters become tokens; empty runs (adjacent delimiters)
/// are skipped.
#[derive(Clone, Debug)]
pub struct DelimiterTokenizer {
    delimiters: HashSet<char>,
}

impl DelimiterTokenizer {
    /// Create a tokenizer with the default delimiters
    /// (space, tab, `.`, `,`, `!`, `?`, `(`, `)`, `{`, `}`).
    pub fn new() -> Self {
        Self::with_delimiters(DEFAULT_DELIMITERS.iter().copied())
    }

    /// Create a tokenizer splitting on the given characters.
    pub fn with_delimiters<I: IntoIterator<Item = char>>(delimiters: I) -> Self {
        DelimiterTokenizer {
            delimiters: delimiters.into_iter().collect(),
        }
    }

    pub fn is_delimiter(&self, ch: char) -> bool {
        self.delimiters.contains(&ch)
    }
}

impl Default for DelimiterTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for DelimiterTokenizer {
    fn process(&self, token: Token) -> Result<TokenStream> {
        let tokens = split_runs(&token, |ch| !self.is_delimiter(ch));
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "delimiter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts_and_spans(tokens: Vec<Token>) -> Vec<(String, usize, usize)> {
        tokens.into_iter().map(|t| (t.text, t.start, t.stop)).collect()
    }

    #[test]
    fn test_default_delimiters() {
        let tokenizer = DelimiterTokenizer::new();
        let tokens: Vec<Token> = tokenizer
            .process(Token::new("Hello, world!  (again)", 0))
            .unwrap()
            .collect();

        assert_eq!(
            texts_and_spans(tokens),
            vec![
                ("Hello".to_string(), 0, 5),
                ("world".to_string(), 7, 12),
                ("again".to_string(), 16, 21),
            ]
        );
    }

    #[test]
    fn test_offsets_are_absolute() {
        let tokenizer = DelimiterTokenizer::with_delimiters(['-']);
        let tokens: Vec<Token> = tokenizer
            .process(Token::new("a-bc", 10))
            .unwrap()
            .collect();

        assert_eq!(
            texts_and_spans(tokens),
            vec![("a".to_string(), 10, 11), ("bc".to_string(), 12, 14)]
        );
    }

    #[test]
    fn test_only_delimiters() {
        let tokenizer = DelimiterTokenizer::new();
        let tokens: Vec<Token> = tokenizer.process(Token::new(" ., ", 0)).unwrap().collect();
        assert!(tokens.is_empty());
    }
}
