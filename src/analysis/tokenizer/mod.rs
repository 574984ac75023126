//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the stages that split one token into the spans a field is
//! indexed by. All of them keep absolute offsets: a span found at byte `i` of a
//! token starting at `s` is emitted starting at `s + i`.
//!
//! # Available Tokenizers
//!
//! - [`keyword::KeywordTokenizer`] - Passes the whole input through
//! - [`delimiter::DelimiterTokenizer`] - Splits on a delimiter character set
//! - [`alphabet::AlphabetTokenizer`] - Keeps runs of word characters

use crate::analysis::token::Token;

pub mod alphabet;
pub mod delimiter;
pub mod keyword;

pub use alphabet::AlphabetTokenizer;
pub use delimiter::DelimiterTokenizer;
pub use keyword::KeywordTokenizer;

/// Split `token` into maximal runs of characters accepted by `keep`, skipping
/// empty runs.
pub(crate) fn split_runs<F>(token: &Token, keep: F) -> Vec<Token>
where
    F: Fn(char) -> bool,
{
    let mut tokens = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, ch) in token.text.char_indices() {
        match (keep(ch), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                tokens.push(Token::new(&token.text[start..i], token.start + start));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        tokens.push(Token::new(&token.text[start..], token.start + start));
    }

    tokens
}
