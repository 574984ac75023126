//! Soundex phonetic filter.
//!
//! Folds a word to a fixed-length code (first letter followed by consonant
//! class digits) so that similar sounding spellings match: `jackson` and
//! `jaqkon` both become `j500`.

use crate::analysis::stage::{self, Stage};
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

const DEFAULT_CODE_LENGTH: usize = 4;

fn soundex_class(ch: char) -> Option<char> {
    match ch {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        _ => None,
    }
}

/// Compute the soundex code of `text` with the given code length.
///
/// Returns `None` for empty text. Characters without a class are skipped and
/// do not reset the previous class, and a class equal to the first letter's is
/// not repeated, so `jaqkon` collapses `j`, `q` and `k`.
pub fn soundex(text: &str, length: usize) -> Option<String> {
    let lowered = text.to_lowercase();
    let mut chars = lowered.chars();
    let first = chars.next()?;

    let mut code = String::with_capacity(length.max(1));
    code.push(first);
    let mut prev = soundex_class(first);
    let mut emitted = 1;

    for ch in chars {
        if emitted >= length {
            break;
        }
        if let Some(class) = soundex_class(ch) {
            if prev != Some(class) {
                code.push(class);
                emitted += 1;
                prev = Some(class);
            }
        }
    }
    while emitted < length {
        code.push('0');
        emitted += 1;
    }

    Some(code)
}

/// A filter that replaces each token with its soundex code.
#[derive(Clone, Debug)]
pub struct SoundexFilter {
    length: usize,
}

impl SoundexFilter {
    pub fn new() -> Self {
        SoundexFilter {
            length: DEFAULT_CODE_LENGTH,
        }
    }

    pub fn with_length(length: usize) -> Self {
        SoundexFilter { length }
    }
}

impl Default for SoundexFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for SoundexFilter {
    fn process(&self, token: Token) -> Result<TokenStream> {
        match soundex(&token.text, self.length) {
            Some(code) => stage::one(token.with_text(code)),
            None => stage::none(),
        }
    }

    fn name(&self) -> &'static str {
        "soundex"
    }
}
