//! Query evaluation.
//!
//! [`Searcher::search`] runs in stages:
//!
//! 1. the query tree is folded bottom-up into one candidate [`BitSet`],
//!    recording the tokens that hit in each field;
//! 2. every candidate is scored by summing the boosts of the fields whose hit
//!    tokens it really contains, times its document boost, and candidates
//!    below the query's boost floor are dropped;
//! 3. candidates are ordered by score, ties by id, and paged;
//! 4. facets, the page's documents and suggestions are computed concurrently;
//! 5. the loaded documents are highlighted.
//!
//! Storage failures never abort a search. They are recorded in
//! [`SearchResult::errors`] with the stage they happened in, and the failed
//! lookup contributes nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, join_all};
use futures::join;
use log::{debug, trace, warn};
use parking_lot::Mutex;
use serde_json::Value;

use crate::analysis::field_type::render_value;
use crate::bitset::{BitSet, DocId};
use crate::config::{EngineConfig, HighlightTags, SortOrder, TermOperation};
use crate::error::{BitsearchError, Result};
use crate::index::{DocumentStore, InvertedIndex, Keys};
use crate::query::{Clause, Operator, Paging, Query, QueryNode, SuggestSpec};
use crate::schema::SharedSchema;
use crate::search::facet::{FacetCounts, count_facets};
use crate::search::highlight::highlight_document;
use crate::search::result::{Phase, SearchError, SearchResult, SearchResultDocument};
use crate::search::suggest::document_suggestions;
use crate::storage::KeyValueStore;

/// Tokens that matched during evaluation, per field.
pub type HitTokens = BTreeMap<String, BTreeSet<String>>;

/// Builder for [`Searcher`].
#[derive(Default)]
pub struct SearcherBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    schema: Option<SharedSchema>,
}

impl SearcherBuilder {
    pub fn new() -> Self {
        SearcherBuilder::default()
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The store to search. Required.
    pub fn storage(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The schema fields are analyzed and weighted with. Required; pass the
    /// indexer's schema so fields it detected are visible.
    pub fn schema(mut self, schema: SharedSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn build(self) -> Result<Searcher> {
        let schema = self
            .schema
            .ok_or_else(|| BitsearchError::configuration("Schema is required."))?;
        let store = self
            .store
            .ok_or_else(|| BitsearchError::configuration("Storage is required."))?;
        let keys = Keys::new(self.config.keys.clone());

        Ok(Searcher {
            documents: DocumentStore::new(Arc::clone(&store), keys.clone()),
            index: InvertedIndex::new(store, keys),
            schema,
            config: self.config,
        })
    }
}

/// Evaluates [`Query`]s against an index.
pub struct Searcher {
    config: EngineConfig,
    schema: SharedSchema,
    documents: DocumentStore,
    index: InvertedIndex,
}

impl Searcher {
    pub fn builder() -> SearcherBuilder {
        SearcherBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn schema(&self) -> SharedSchema {
        Arc::clone(&self.schema)
    }

    /// Run `query`. Partial failures are reported in the result's `errors`.
    pub async fn search(&self, query: &Query) -> SearchResult {
        let started = Instant::now();
        debug!("REQUEST {query}");

        let paging = query
            .paging
            .unwrap_or_else(|| Paging::new(self.config.default_offset, self.config.default_limit));
        let mut result = SearchResult::new(paging);
        let evaluation = Evaluation::new(self);

        let matched = evaluation.evaluate_node(&query.root).await;
        debug!("found #{} documents", matched.len());
        let hits = evaluation.take_hits();

        let ranked = evaluation.rank(&matched, &hits, query.boost).await;
        let ids: Vec<DocId> = ranked.iter().map(|(id, _)| *id).collect();
        result.total = ids.len();
        let window: Vec<(DocId, f64)> = ranked
            .into_iter()
            .skip(paging.offset)
            .take(paging.limit)
            .collect();

        let (facets, documents, suggests) = join!(
            evaluation.facets(&query.facets, &matched),
            evaluation.documents(&window),
            evaluation.suggest(query.suggest.as_ref(), &ids),
        );
        result.facets = facets;
        result.documents = documents;
        for (field, text) in suggests {
            result.add_suggest(&field, text);
        }

        let tags = query
            .highlight_tags
            .as_ref()
            .unwrap_or(&self.config.highlight_tags);
        evaluation
            .highlight(&mut result.documents, &query.highlight, &hits, tags)
            .await;

        result.errors = evaluation.into_errors();
        result.took = started.elapsed();
        debug!("RESPONSE {result}");
        result
    }
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("config", &self.config)
            .field("schema", &*self.schema.read())
            .finish()
    }
}

/// State of one search: collected errors and hit tokens.
struct Evaluation<'a> {
    searcher: &'a Searcher,
    errors: Mutex<Vec<SearchError>>,
    hits: Mutex<HitTokens>,
}

impl<'a> Evaluation<'a> {
    fn new(searcher: &'a Searcher) -> Self {
        Evaluation {
            searcher,
            errors: Mutex::new(Vec::new()),
            hits: Mutex::new(HitTokens::new()),
        }
    }

    fn record(&self, phase: Phase, error: &BitsearchError) {
        warn!("{phase}: {error}");
        self.errors.lock().push(SearchError::new(phase, error));
    }

    fn take_hits(&self) -> HitTokens {
        std::mem::take(&mut *self.hits.lock())
    }

    fn into_errors(self) -> Vec<SearchError> {
        self.errors.into_inner()
    }

    fn index(&self) -> &InvertedIndex {
        &self.searcher.index
    }

    async fn all(&self) -> BitSet {
        match self.index().all().await {
            Ok(all) => all,
            Err(e) => {
                self.record(Phase::Search, &e);
                BitSet::new()
            }
        }
    }

    fn evaluate_clause<'s>(&'s self, clause: &'s Clause) -> BoxFuture<'s, Option<BitSet>> {
        match clause {
            Clause::Term { field, value } => self.evaluate_term(field, value).boxed(),
            Clause::Node(node) => self.evaluate_node(node).map(Some).boxed(),
        }
    }

    /// Fold the children of `node`. Children that contribute nothing are
    /// skipped; with none left an AND or OR node matches every document and
    /// a NOT node matches none.
    async fn evaluate_node(&self, node: &QueryNode) -> BitSet {
        let children: Vec<BitSet> =
            join_all(node.clauses.iter().map(|clause| self.evaluate_clause(clause)))
                .await
                .into_iter()
                .flatten()
                .collect();

        let mut children = children.into_iter();
        let Some(mut acc) = children.next() else {
            return match node.operator {
                Operator::And | Operator::Or => self.all().await,
                Operator::Not => BitSet::new(),
            };
        };

        match node.operator {
            Operator::And => {
                for child in children {
                    acc.and(&child);
                }
                acc
            }
            Operator::Or => {
                for child in children {
                    acc.or(&child);
                }
                acc
            }
            Operator::Not => {
                for child in children {
                    acc.or(&child);
                }
                match self.index().complement(&acc).await {
                    Ok(complement) => complement,
                    Err(e) => {
                        self.record(Phase::Search, &e);
                        BitSet::new()
                    }
                }
            }
        }
    }

    /// Postings of one leaf, or `None` when its value yields no token.
    async fn evaluate_term(&self, field: &str, value: &Value) -> Option<BitSet> {
        let pipeline = {
            let schema = self.searcher.schema.read();
            schema
                .get_field(field)
                .filter(|f| !f.is_unresolved())
                .map(|f| f.field_type().pipeline())
        };
        let Some(pipeline) = pipeline else {
            debug!("field '{field}' is not indexed; term matches nothing");
            return Some(BitSet::new());
        };

        let text = render_value(value)?;
        let tokens = match pipeline.analyze(&text) {
            Ok(tokens) => tokens,
            Err(e) => {
                self.record(Phase::Search, &e);
                return None;
            }
        };
        let texts: BTreeSet<String> = tokens.into_iter().map(|t| t.text).collect();
        if texts.is_empty() {
            trace!("'{text}' yields no token for field '{field}'");
            return None;
        }

        let postings = join_all(
            texts
                .iter()
                .map(|text| self.index().get_postings(field, text)),
        )
        .await;

        let operation = self.searcher.config.default_term_operation;
        let mut acc: Option<BitSet> = None;
        for (text, posting) in texts.iter().zip(postings) {
            let posting = match posting {
                Ok(posting) => posting,
                Err(e) => {
                    self.record(Phase::Search, &e);
                    continue;
                }
            };
            if !posting.is_empty() {
                self.hits
                    .lock()
                    .entry(field.to_string())
                    .or_default()
                    .insert(text.clone());
            }
            match acc.as_mut() {
                None => acc = Some(posting),
                Some(acc) => match operation {
                    TermOperation::And => {
                        acc.and(&posting);
                    }
                    TermOperation::Or => {
                        acc.or(&posting);
                    }
                },
            }
        }
        acc
    }

    /// Score and order `matched`, dropping candidates below `floor`.
    async fn rank(&self, matched: &BitSet, hits: &HitTokens, floor: Option<f64>) -> Vec<(DocId, f64)> {
        let weighted: Vec<(String, f64, Vec<String>)> = {
            let schema = self.searcher.schema.read();
            schema
                .fields()
                .filter_map(|f| {
                    hits.get(f.name())
                        .map(|texts| (f.name().to_string(), f.boost(), texts.iter().cloned().collect()))
                })
                .collect()
        };

        let ids: Vec<DocId> = matched.iter().collect();
        let scores = join_all(ids.iter().map(|&id| self.score(id, &weighted))).await;

        let mut ranked: Vec<(DocId, f64)> = ids
            .into_iter()
            .zip(scores)
            .filter(|(_, score)| floor.is_none_or(|floor| *score >= floor))
            .collect();

        let order = self.searcher.config.sort_order;
        ranked.sort_by(|a, b| {
            let by_score = a.1.total_cmp(&b.1);
            let by_score = match order {
                SortOrder::Ascending => by_score,
                SortOrder::Descending => by_score.reverse(),
            };
            by_score.then(a.0.cmp(&b.0))
        });
        ranked
    }

    async fn score(&self, id: DocId, weighted: &[(String, f64, Vec<String>)]) -> f64 {
        let lookups = weighted.iter().flat_map(|(field, boost, texts)| {
            texts.iter().map(move |text| async move {
                self.index()
                    .get_token(id, field, text)
                    .await
                    .map(|token| token.map(|_| *boost))
            })
        });
        let (confirmed, document_boost) =
            join!(join_all(lookups), self.index().get_document_boost(id));

        let mut field_boost = 0.0;
        for boost in confirmed {
            match boost {
                Ok(Some(boost)) => field_boost += boost,
                Ok(None) => {}
                Err(e) => self.record(Phase::Sorting, &e),
            }
        }

        let default = self.searcher.config.default_document_boost;
        let document_boost = match document_boost {
            Ok(boost) => boost.unwrap_or(default),
            Err(e) => {
                self.record(Phase::Sorting, &e);
                default
            }
        };

        let score = field_boost * document_boost;
        trace!("document #{id} scored {score}");
        score
    }

    async fn facets(&self, fields: &[String], matched: &BitSet) -> BTreeMap<String, FacetCounts> {
        if fields.is_empty() {
            debug!("Facet section is skipped.");
            return BTreeMap::new();
        }
        let counts = join_all(
            fields
                .iter()
                .map(|field| count_facets(self.index(), field, matched)),
        )
        .await;

        let mut facets = BTreeMap::new();
        for (field, counts) in fields.iter().zip(counts) {
            match counts {
                Ok(counts) if !counts.is_empty() => {
                    facets.insert(field.clone(), counts);
                }
                Ok(_) => {}
                Err(e) => self.record(Phase::Facets, &e),
            }
        }
        facets
    }

    async fn documents(&self, window: &[(DocId, f64)]) -> Vec<SearchResultDocument> {
        let loaded = join_all(window.iter().map(|(id, _)| self.searcher.documents.load(*id))).await;

        let mut documents = Vec::with_capacity(window.len());
        for (&(id, score), source) in window.iter().zip(loaded) {
            match source {
                Ok(Some(source)) => documents.push(SearchResultDocument::new(id, source, score)),
                Ok(None) => self.record(
                    Phase::Documents,
                    &BitsearchError::not_found(format!("document {id}")),
                ),
                Err(e) => self.record(Phase::Documents, &e),
            }
        }
        documents
    }

    async fn suggest(&self, spec: Option<&SuggestSpec>, ids: &[DocId]) -> Vec<(String, String)> {
        let Some(spec) = spec.filter(|s| !s.fields.is_empty()) else {
            debug!("Suggest section is skipped.");
            return Vec::new();
        };
        let per_document = join_all(ids.iter().map(|&id| {
            document_suggestions(self.index(), &self.searcher.documents, id, spec)
        }))
        .await;

        let mut suggestions = Vec::new();
        for (found, errors) in per_document {
            for e in &errors {
                self.record(Phase::Suggest, e);
            }
            suggestions.extend(found);
        }
        suggestions
    }

    async fn highlight(
        &self,
        documents: &mut [SearchResultDocument],
        fields: &[String],
        hits: &HitTokens,
        tags: &HighlightTags,
    ) {
        if fields.is_empty() || documents.is_empty() {
            debug!("Highlight section is skipped.");
            return;
        }
        let variants = join_all(
            documents
                .iter()
                .map(|document| highlight_document(self.index(), document, fields, hits, tags)),
        )
        .await;

        for (document, (variants, errors)) in documents.iter_mut().zip(variants) {
            for e in &errors {
                self.record(Phase::Highlight, e);
            }
            for (field, text) in variants {
                document.add_highlight(&field, text);
            }
        }
    }
}
