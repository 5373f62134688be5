//! Query-time retrieval over the chunk index.
//!
//! Retrieval never fails the caller: embedding outages degrade the
//! query to lexical-only, and backend faults degrade to an empty
//! result set. Both paths are logged at warn.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::{SearchResult, SearchStore};
use vellum_llm::LlmProvider;

/// How a query is matched against the index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// BM25 text match only.
    Lexical,
    /// k-NN over embeddings only.
    Vector,
    /// Weighted combination of both.
    #[default]
    Hybrid,
}

/// Retrieval parameters.
#[derive(Clone, Copy, Debug)]
pub struct QueryConfig {
    pub mode: SearchMode,
    /// Result count cap.
    pub size: usize,
    /// Minimum cosine score for vector-only hits.
    pub min_score: f32,
    pub text_weight: f32,
    pub vector_weight: f32,
    /// Context budget in characters.
    pub max_context_length: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::Hybrid,
            size: 5,
            min_score: 0.7,
            text_weight: 0.5,
            vector_weight: 0.5,
            max_context_length: 50_000,
        }
    }
}

/// Retrieves ranked chunks for a question.
pub struct Retriever<P: LlmProvider> {
    store: SearchStore,
    provider: Arc<P>,
    config: QueryConfig,
}

impl<P: LlmProvider> Retriever<P> {
    #[must_use]
    pub fn new(store: SearchStore, provider: Arc<P>, config: QueryConfig) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Retrieve up to `config.size` chunks for `query`.
    ///
    /// Always returns a result set; failures are absorbed down to an
    /// empty vec so the answer path can report "no evidence" instead
    /// of erroring.
    pub async fn retrieve(&self, query: &str) -> Vec<SearchResult> {
        let outcome = match self.config.mode {
            SearchMode::Lexical => self.store.search(query, self.config.size).await,
            SearchMode::Vector => match self.embed_query(query).await {
                Some(vector) => {
                    self.store
                        .vector_search(&vector, self.config.size, self.config.min_score)
                        .await
                }
                None => self.store.search(query, self.config.size).await,
            },
            SearchMode::Hybrid => {
                let vector = self.embed_query(query).await;
                self.store
                    .hybrid_search(
                        query,
                        vector.as_deref(),
                        self.config.size,
                        self.config.text_weight,
                        self.config.vector_weight,
                    )
                    .await
            }
        };
        match outcome {
            Ok(results) => {
                tracing::debug!(hits = results.len(), "retrieval complete");
                results
            }
            Err(e) => {
                tracing::warn!("retrieval failed, returning no results: {e}");
                Vec::new()
            }
        }
    }

    async fn embed_query(&self, query: &str) -> Option<Vec<f32>> {
        match self.provider.embed(query).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                tracing::warn!("query embedding failed, degrading to lexical: {e}");
                None
            }
        }
    }
}
