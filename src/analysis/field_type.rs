//! Field types and runtime value classification.
//!
//! A [`FieldType`] names the pipeline a field's values are analyzed with. The
//! predefined types are built once and shared; [`FieldType::Custom`] carries a
//! caller-built [`Pipeline`]. A field starts out as [`FieldType::Auto`] and is
//! resolved from the first value it is indexed with via [`ValueKind`].

use std::fmt;
use std::sync::{Arc, LazyLock};

use serde_json::Value;

use crate::analysis::pipeline::Pipeline;
use crate::analysis::token_filter::date::looks_like_date;
use crate::analysis::token_filter::number::format_number;
use crate::analysis::token_filter::{
    BooleanFilter, DateFilter, LengthFilter, LowercaseFilter, NumberFilter, SkipFilter,
    SoundexFilter, StopFilter, SuggestFilter,
};
use crate::analysis::tokenizer::{AlphabetTokenizer, KeywordTokenizer};

fn text_pipeline(name: &str) -> Pipeline {
    Pipeline::new(name)
        .add_stage(Arc::new(AlphabetTokenizer::new()))
        .add_stage(Arc::new(LengthFilter::new()))
        .add_stage(Arc::new(LowercaseFilter::new()))
        .add_stage(Arc::new(StopFilter::new()))
}

static AUTO: LazyLock<Arc<Pipeline>> = LazyLock::new(|| Arc::new(Pipeline::new("AUTO")));

static SKIP: LazyLock<Arc<Pipeline>> =
    LazyLock::new(|| Arc::new(Pipeline::new("SKIP").add_stage(Arc::new(SkipFilter::new()))));

static KEYWORD: LazyLock<Arc<Pipeline>> = LazyLock::new(|| {
    Arc::new(Pipeline::new("KEYWORD").add_stage(Arc::new(KeywordTokenizer::new())))
});

static TEXT: LazyLock<Arc<Pipeline>> = LazyLock::new(|| Arc::new(text_pipeline("TEXT")));

static NUMBER: LazyLock<Arc<Pipeline>> =
    LazyLock::new(|| Arc::new(Pipeline::new("NUMBER").add_stage(Arc::new(NumberFilter::new()))));

static BOOLEAN: LazyLock<Arc<Pipeline>> = LazyLock::new(|| {
    Arc::new(Pipeline::new("BOOLEAN").add_stage(Arc::new(BooleanFilter::new())))
});

static DATE: LazyLock<Arc<Pipeline>> =
    LazyLock::new(|| Arc::new(Pipeline::new("DATE").add_stage(Arc::new(DateFilter::new()))));

static SUGGEST: LazyLock<Arc<Pipeline>> = LazyLock::new(|| {
    Arc::new(
        Pipeline::new("SUGGEST")
            .add_stage(Arc::new(KeywordTokenizer::new()))
            .add_stage(Arc::new(LowercaseFilter::new()))
            .add_stage(Arc::new(SuggestFilter::new())),
    )
});

static SOUNDEX: LazyLock<Arc<Pipeline>> = LazyLock::new(|| {
    Arc::new(text_pipeline("SOUNDEX").add_stage(Arc::new(SoundexFilter::new())))
});

/// The analysis type of a field.
#[derive(Clone, Default)]
pub enum FieldType {
    /// Not yet resolved; replaced by a detected type on first indexing.
    #[default]
    Auto,
    /// Stored but never indexed.
    Skip,
    /// The whole value is one term.
    Keyword,
    /// Letters only, lowercased, stop words removed.
    Text,
    Number,
    Boolean,
    /// Indexed as epoch milliseconds.
    Date,
    /// Lowercased whole value expanded to its prefixes.
    Suggest,
    /// TEXT followed by a soundex code per word.
    Soundex,
    Custom(Arc<Pipeline>),
}

impl FieldType {
    /// The pipeline values of this type are analyzed with.
    pub fn pipeline(&self) -> Arc<Pipeline> {
        match self {
            FieldType::Auto => Arc::clone(&AUTO),
            FieldType::Skip => Arc::clone(&SKIP),
            FieldType::Keyword => Arc::clone(&KEYWORD),
            FieldType::Text => Arc::clone(&TEXT),
            FieldType::Number => Arc::clone(&NUMBER),
            FieldType::Boolean => Arc::clone(&BOOLEAN),
            FieldType::Date => Arc::clone(&DATE),
            FieldType::Suggest => Arc::clone(&SUGGEST),
            FieldType::Soundex => Arc::clone(&SOUNDEX),
            FieldType::Custom(pipeline) => Arc::clone(pipeline),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldType::Auto => "AUTO",
            FieldType::Skip => "SKIP",
            FieldType::Keyword => "KEYWORD",
            FieldType::Text => "TEXT",
            FieldType::Number => "NUMBER",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Date => "DATE",
            FieldType::Suggest => "SUGGEST",
            FieldType::Soundex => "SOUNDEX",
            FieldType::Custom(pipeline) => pipeline.name(),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, FieldType::Auto)
    }

    /// Detect the type for a field from a value it is indexed with.
    pub fn detect(value: &Value) -> FieldType {
        ValueKind::of(value).field_type()
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldType::Custom(a), FieldType::Custom(b)) => Arc::ptr_eq(a, b),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Custom(pipeline) => f.debug_tuple("Custom").field(pipeline).finish(),
            other => f.write_str(other.name()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of a runtime document value, used for type auto-detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Date,
    Array,
    String,
    Number,
    Boolean,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Null,
            Value::String(s) if looks_like_date(s) => ValueKind::Date,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn field_type(self) -> FieldType {
        match self {
            ValueKind::Date => FieldType::Date,
            ValueKind::Number => FieldType::Number,
            ValueKind::Boolean => FieldType::Boolean,
            ValueKind::Null | ValueKind::Array | ValueKind::String | ValueKind::Object => {
                FieldType::Text
            }
        }
    }
}

/// Render a document value as the text fed to analysis and highlighting.
///
/// Returns `None` for `null`, which is never indexed.
pub fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.as_f64().map_or_else(|| n.to_string(), format_number)),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| render_value(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
