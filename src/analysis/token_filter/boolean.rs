//! Boolean coercion filter.

use crate::analysis::stage::{self, Stage};
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// A filter that coerces token text to `"true"` or `"false"`.
///
/// Only the exact text `true` is true; everything else, including `TRUE` and
/// `1`, becomes `false`.
#[derive(Clone, Debug, Default)]
pub struct BooleanFilter;

impl BooleanFilter {
    pub fn new() -> Self {
        BooleanFilter
    }
}

impl Stage for BooleanFilter {
    fn process(&self, token: Token) -> Result<TokenStream> {
        let value = token.text == "true";
        stage::one(token.with_text(value.to_string()))
    }

    fn name(&self) -> &'static str {
        "boolean"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce(text: &str) -> String {
        let filter = BooleanFilter::new();
        filter.process(Token::new(text, 0)).unwrap().next().unwrap().text
    }

    #[test]
    fn test_boolean_filter() {
        assert_eq!(coerce("true"), "true");
        assert_eq!(coerce("false"), "false");
        assert_eq!(coerce("TRUE"), "false");
        assert_eq!(coerce("yes"), "false");
        assert_eq!(coerce(""), "false");
    }
}
