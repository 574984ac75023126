//! Keyword tokenizer implementation.

use crate::analysis::stage::{self, Stage};
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// A tokenizer that treats the entire input as a single token.
///
/// This is useful for ID fields or other cases where you don't want to split the text.
#[derive(Clone, Debug, Default)]
pub struct KeywordTokenizer;

impl KeywordTokenizer {
    /// Create a new keyword tokenizer.
    pub fn new() -> Self {
        KeywordTokenizer
    }
}

impl Stage for KeywordTokenizer {
    fn process(&self, token: Token) -> Result<TokenStream> {
        stage::one(token)
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_tokenizer() {
        let tokenizer = KeywordTokenizer::new();
        let tokens: Vec<Token> = tokenizer
            .process(Token::new("978-1423103349", 0))
            .unwrap()
            .collect();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "978-1423103349");
        assert_eq!(tokens[0].start, 0);
        assert_eq!(tokens[0].stop, 14);
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(KeywordTokenizer::new().name(), "keyword");
    }
}
