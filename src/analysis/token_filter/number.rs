//! Number coercion filter.
//!
//! Rewrites token text into a canonical numeric string so that `"1"`, `"1.0"`
//! and `" 1 "` all index as the same term `1`.

use crate::analysis::stage::{self, Stage};
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Parse text the way a lenient numeric conversion would: surrounding
/// whitespace is ignored, empty text is zero, and anything unparseable is NaN.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    match trimmed.parse::<f64>() {
        // Rust accepts "inf" and "nan" spellings that are not numbers here.
        Ok(n) if n.is_finite() => n,
        _ => f64::NAN,
    }
}

/// Render a number in its shortest decimal form (`1`, `0.5`, `-3.25`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        // folds -0 into 0
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// A filter that coerces token text to its numeric string form.
#[derive(Clone, Debug, Default)]
pub struct NumberFilter;

impl NumberFilter {
    pub fn new() -> Self {
        NumberFilter
    }
}

impl Stage for NumberFilter {
    fn process(&self, token: Token) -> Result<TokenStream> {
        let text = format_number(parse_number(&token.text));
        stage::one(token.with_text(text))
    }

    fn name(&self) -> &'static str {
        "number"
    }
}
