//! Token filter implementations for token transformation.
//!
//! Filters are stages that take a token and emit a rewritten token, nothing,
//! or (for [`SuggestFilter`]) several tokens. They never move spans: every
//! emitted token keeps the offsets of the token it came from.

// Individual filter modules
pub mod boolean;
pub mod date;
pub mod length;
pub mod lowercase;
pub mod number;
pub mod skip;
pub mod soundex;
pub mod stop;
pub mod suggest;

// Re-export all filters for convenient access
pub use boolean::BooleanFilter;
pub use date::DateFilter;
pub use length::LengthFilter;
pub use lowercase::LowercaseFilter;
pub use number::NumberFilter;
pub use skip::SkipFilter;
pub use soundex::SoundexFilter;
pub use stop::StopFilter;
pub use suggest::SuggestFilter;
