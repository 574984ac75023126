//! Skip filter implementation.

use crate::analysis::stage::{self, Stage};
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// A filter that drops every token. Fields typed SKIP are stored but never
/// indexed.
#[derive(Clone, Debug, Default)]
pub struct SkipFilter;

impl SkipFilter {
    pub fn new() -> Self {
        SkipFilter
    }
}

impl Stage for SkipFilter {
    fn process(&self, _token: Token) -> Result<TokenStream> {
        stage::none()
    }

    fn name(&self) -> &'static str {
        "skip"
    }
}
