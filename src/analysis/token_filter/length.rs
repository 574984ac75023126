//! Length filter implementation.

use crate::analysis::stage::{self, Stage};
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// A filter that drops tokens shorter than a minimum number of characters.
///
/// The default minimum is 0, which keeps every token.
#[derive(Clone, Debug, Default)]
pub struct LengthFilter {
    min_length: usize,
}

impl LengthFilter {
    pub fn new() -> Self {
        LengthFilter::default()
    }

    pub fn with_min_length(min_length: usize) -> Self {
        LengthFilter { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }
}

impl Stage for LengthFilter {
    fn process(&self, token: Token) -> Result<TokenStream> {
        if token.text.chars().count() >= self.min_length {
            stage::one(token)
        } else {
            stage::none()
        }
    }

    fn name(&self) -> &'static str {
        "length"
    }
}
