//! Alphabet-based tokenizer implementation.
//!
//! Keeps maximal runs of "word characters" and discards everything else. What
//! counts as a word character is configurable: ASCII letters by
//! default, an arbitrary predicate, or a regex matched against each character.
//!
//! ```
//! use bitsearch::analysis::stage::Stage;
//! use bitsearch::analysis::token::Token;
//! use bitsearch::analysis::tokenizer::AlphabetTokenizer;
//!
//! let tokenizer = AlphabetTokenizer::new();
//! let tokens: Vec<_> = tokenizer.process(Token::new("Sophie's World", 0)).unwrap().collect();
//! let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["Sophie", "s", "World"]);
//! ```

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::analysis::stage::Stage;
use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::split_runs;
use crate::error::{BitsearchError, Result};

#[derive(Clone)]
enum WordChars {
    Alphabetic,
    Pattern(Regex),
    Predicate(Arc<dyn Fn(char) -> bool + Send + Sync>),
}

impl WordChars {
    fn accepts(&self, ch: char) -> bool {
        match self {
            WordChars::Alphabetic => ch.is_ascii_alphabetic(),
            WordChars::Pattern(regex) => {
                let mut buf = [0u8; 4];
                regex.is_match(ch.encode_utf8(&mut buf))
            }
            WordChars::Predicate(predicate) => predicate(ch),
        }
    }
}

/// A tokenizer that splits text on anything that is not a word character.
#[derive(Clone)]
pub struct AlphabetTokenizer {
    word_chars: WordChars,
}

impl AlphabetTokenizer {
    /// Create a tokenizer whose word characters are the ASCII letters.
    pub fn new() -> Self {
        AlphabetTokenizer {
            word_chars: WordChars::Alphabetic,
        }
    }

    /// Create a tokenizer whose word characters match `pattern`, e.g. `[a-z0-9]`.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| BitsearchError::analysis(format!("Invalid word pattern: {e}")))?;
        Ok(AlphabetTokenizer {
            word_chars: WordChars::Pattern(regex),
        })
    }

    /// Create a tokenizer with a custom word character test.
    pub fn with_predicate<F>(predicate: F) -> Self
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        AlphabetTokenizer {
            word_chars: WordChars::Predicate(Arc::new(predicate)),
        }
    }
}

impl Default for AlphabetTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AlphabetTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.word_chars {
            WordChars::Alphabetic => "alphabetic".to_string(),
            WordChars::Pattern(regex) => regex.as_str().to_string(),
            WordChars::Predicate(_) => "<predicate>".to_string(),
        };
        f.debug_struct("AlphabetTokenizer")
            .field("word_chars", &kind)
            .finish()
    }
}

impl Stage for AlphabetTokenizer {
    fn process(&self, token: Token) -> Result<TokenStream> {
        let tokens = split_runs(&token, |ch| self.word_chars.accepts(ch));
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "alphabet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_tokenizer() {
        let tokenizer = AlphabetTokenizer::new();
        let tokens: Vec<Token> = tokenizer
            .process(Token::new("Lucene in Action, Second Edition", 0))
            .unwrap()
            .collect();

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Lucene", "in", "Action", "Second", "Edition"]);
        assert_eq!((tokens[2].start, tokens[2].stop), (10, 16));
    }

    #[test]
    fn test_digits_are_separators_by_default() {
        let tokenizer = AlphabetTokenizer::new();
        let tokens: Vec<Token> = tokenizer.process(Token::new("abc123def", 0)).unwrap().collect();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["abc", "def"]);
        assert_eq!(tokens[1].start, 6);
    }

    #[test]
    fn test_pattern_word_chars() {
        let tokenizer = AlphabetTokenizer::with_pattern("[a-z0-9]").unwrap();
        let tokens: Vec<Token> = tokenizer.process(Token::new("ab1 CD e", 0)).unwrap().collect();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["ab1", "e"]);
    }

    #[test]
    fn test_predicate_word_chars() {
        let tokenizer = AlphabetTokenizer::with_predicate(|c| c != '/');
        let tokens: Vec<Token> = tokenizer.process(Token::new("a b/c", 0)).unwrap().collect();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a b", "c"]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(AlphabetTokenizer::with_pattern("[").is_err());
    }
}
