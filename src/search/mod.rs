//! Query evaluation and result shaping.

pub mod facet;
pub mod highlight;
pub mod result;
pub mod searcher;
pub mod suggest;

pub use self::facet::FacetCounts;
pub use self::result::{HighlightValue, Phase, SearchError, SearchResult, SearchResultDocument};
pub use self::searcher::{HitTokens, Searcher, SearcherBuilder};
