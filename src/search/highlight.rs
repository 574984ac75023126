//! Hit highlighting.
//!
//! Each hit token of a field is looked up in the document's token records; a
//! confirmed hit yields one copy of the field's rendered text with the
//! highlight tags spliced around the token's span. Several hits on one field
//! give several variants, never a merged string.

use futures::future::join_all;

use crate::analysis::field_type::render_value;
use crate::analysis::token::Token;
use crate::config::HighlightTags;
use crate::error::BitsearchError;
use crate::index::InvertedIndex;
use crate::search::result::SearchResultDocument;
use crate::search::searcher::HitTokens;

/// Insert `at` into `text` at byte `index`. An index past the end appends; an
/// index inside a character moves back to that character's start.
fn insert(text: &mut String, index: usize, at: &str) {
    if index >= text.len() {
        text.push_str(at);
        return;
    }
    let mut index = index;
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    text.insert_str(index, at);
}

/// Wrap the span of `token` in `text` with `tags`.
///
/// ```
/// use bitsearch::analysis::token::Token;
/// use bitsearch::config::HighlightTags;
/// use bitsearch::search::highlight::splice;
///
/// let tags = HighlightTags::new("<u>", "</u>");
/// let text = splice("The Lightning Thief", &Token::new("lightning", 4), &tags);
/// assert_eq!(text, "The <u>Lightning</u> Thief");
/// ```
pub fn splice(text: &str, token: &Token, tags: &HighlightTags) -> String {
    let mut out = String::with_capacity(text.len() + tags.start.len() + tags.end.len());
    out.push_str(text);
    insert(&mut out, token.stop, &tags.end);
    insert(&mut out, token.start, &tags.start);
    out
}

/// Highlighted variants of `document`, as `(field, text)` pairs in the order
/// of `fields` and then of `hits`.
pub async fn highlight_document(
    index: &InvertedIndex,
    document: &SearchResultDocument,
    fields: &[String],
    hits: &HitTokens,
    tags: &HighlightTags,
) -> (Vec<(String, String)>, Vec<BitsearchError>) {
    let lookups: Vec<(&str, &str)> = fields
        .iter()
        .filter_map(|field| hits.get(field).map(|texts| (field, texts)))
        .flat_map(|(field, texts)| texts.iter().map(move |text| (field.as_str(), text.as_str())))
        .collect();

    let tokens = join_all(
        lookups
            .iter()
            .map(|(field, text)| index.get_token(document.id, field, text)),
    )
    .await;

    let mut variants = Vec::new();
    let mut errors = Vec::new();
    for ((field, _), token) in lookups.into_iter().zip(tokens) {
        match token {
            Ok(Some(token)) => {
                if let Some(text) = document.source_field(field).and_then(render_value) {
                    variants.push((field.to_string(), splice(&text, &token, tags)));
                }
            }
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }
    (variants, errors)
}
