//! The stage abstraction shared by tokenizers and token filters.
//!
//! A stage consumes one token and emits zero or more tokens. Tokenizers split,
//! filters coerce, drop, or multiply. Because every stage has the same shape,
//! a [`Pipeline`](crate::analysis::pipeline::Pipeline) can carry each emitted
//! token independently through the remaining stages.

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Trait for one step of an analysis pipeline.
///
/// # Examples
///
/// Implementing a custom stage:
///
/// ```
/// use bitsearch::analysis::stage::Stage;
/// use bitsearch::analysis::token::{Token, TokenStream};
/// use bitsearch::error::Result;
///
/// struct ReverseFilter;
///
/// impl Stage for ReverseFilter {
///     fn process(&self, token: Token) -> Result<TokenStream> {
///         let reversed: String = token.text.chars().rev().collect();
///         Ok(Box::new(std::iter::once(token.with_text(reversed))))
///     }
///
///     fn name(&self) -> &'static str {
///         "reverse"
///     }
/// }
/// ```
pub trait Stage: Send + Sync {
    /// Transform one input token into the tokens passed downstream.
    fn process(&self, token: Token) -> Result<TokenStream>;

    /// Get the name of this stage (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Emit nothing.
pub(crate) fn none() -> Result<TokenStream> {
    Ok(Box::new(std::iter::empty()))
}

/// Emit exactly one token.
pub(crate) fn one(token: Token) -> Result<TokenStream> {
    Ok(Box::new(std::iter::once(token)))
}
