//! Date coercion filter.
//!
//! Parses token text as a date and rewrites it to epoch milliseconds, so any
//! accepted spelling of the same instant indexes as the same term. Tokens that
//! do not parse are dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::analysis::stage::{self, Stage};
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Parse `text` as RFC 3339, RFC 2822, `YYYY-MM-DDTHH:MM:SS` (UTC) or
/// `YYYY-MM-DD` (UTC midnight) and return epoch milliseconds.
pub fn parse_epoch_millis(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Whether `text` is a date string the auto type detection treats as DATE.
///
/// Stricter than [`parse_epoch_millis`]: only RFC 3339 timestamps and
/// `YYYY-MM-DD` dates qualify, so free text is never mistaken for a date.
pub fn looks_like_date(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// A filter that coerces dates to their epoch millisecond string.
#[derive(Clone, Debug, Default)]
pub struct DateFilter;

impl DateFilter {
    pub fn new() -> Self {
        DateFilter
    }
}

impl Stage for DateFilter {
    fn process(&self, token: Token) -> Result<TokenStream> {
        match parse_epoch_millis(&token.text) {
            Some(millis) => stage::one(token.with_text(millis.to_string())),
            None => stage::none(),
        }
    }

    fn name(&self) -> &'static str {
        "date"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce(text: &str) -> Option<String> {
        let filter = DateFilter::new();
        filter.process(Token::new(text, 0)).unwrap().next().map(|t| t.text)
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(coerce("1970-01-02"), Some("86400000".to_string()));
        assert_eq!(
            coerce("1970-01-01T00:00:01Z"),
            Some("1000".to_string())
        );
        assert_eq!(
            coerce("1970-01-01T01:00:00+01:00"),
            Some("0".to_string())
        );
        assert_eq!(
            coerce("Thu, 01 Jan 1970 00:00:02 +0000"),
            Some("2000".to_string())
        );
        assert_eq!(coerce("1970-01-01T00:00:03"), Some("3000".to_string()));
    }

    #[test]
    fn test_unparseable_is_dropped() {
        assert_eq!(coerce("yesterday"), None);
        assert_eq!(coerce("2020-13-01"), None);
    }

    #[test]
    fn test_looks_like_date() {
        assert!(looks_like_date("2011-10-05"));
        assert!(looks_like_date("2011-10-05T14:48:00Z"));
        assert!(!looks_like_date("Percy Jackson"));
        assert!(!looks_like_date("2011"));
    }
}
