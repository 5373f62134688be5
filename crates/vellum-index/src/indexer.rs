//! Ingestion orchestration: segment → embed → persist.

use std::sync::Arc;

use serde_json::Value;

use crate::element::Element;
use crate::segmenter::{SegmenterConfig, segment_elements};
use crate::store::{ChunkFailure, SearchStore};
use vellum_llm::LlmProvider;

/// Indexer configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexerConfig {
    pub segmenter: SegmenterConfig,
}

/// Summary of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Chunks produced by segmentation.
    pub chunks: usize,
    /// Records persisted.
    pub saved_ids: Vec<String>,
    /// Per-chunk write failures.
    pub failures: Vec<ChunkFailure>,
    /// Whether embedding vectors accompanied the records.
    pub embedded: bool,
    pub duration_ms: u64,
}

impl IngestReport {
    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved_ids.len()
    }
}

/// Embed chunk texts for indexing, degrading to no vectors on failure.
///
/// The batch is all-or-nothing: a provider failure yields an empty
/// vector list (logged at warn) and the pipeline continues
/// lexical-only. Empty input yields empty output without a provider
/// call.
pub async fn embed_chunks<P: LlmProvider>(provider: &P, texts: &[String]) -> Vec<Vec<f32>> {
    if texts.is_empty() {
        return Vec::new();
    }
    match provider.embed_batch(texts).await {
        Ok(vectors) => {
            tracing::debug!(count = vectors.len(), "chunk embeddings generated");
            vectors
        }
        Err(e) => {
            tracing::warn!("embedding unavailable, indexing without vectors: {e}");
            Vec::new()
        }
    }
}

/// Orchestrates ingestion of one document's element stream.
pub struct DocumentIndexer<P: LlmProvider> {
    store: SearchStore,
    provider: Arc<P>,
    config: IndexerConfig,
}

impl<P: LlmProvider> DocumentIndexer<P> {
    #[must_use]
    pub fn new(store: SearchStore, provider: Arc<P>, config: IndexerConfig) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    /// Segment `elements`, embed the chunks when the provider allows,
    /// and upsert everything under `document_name`.
    ///
    /// Never fails: a stream that yields no chunks (malformed, empty,
    /// or headerless) produces a zero-chunk report, and an index that
    /// cannot be reached or created produces a report marking every
    /// chunk as failed. Per-chunk write failures are reported the same
    /// way.
    pub async fn ingest(
        &self,
        document_name: &str,
        elements: &[Element],
        metadata: &Value,
    ) -> IngestReport {
        let start = std::time::Instant::now();

        let chunks = segment_elements(elements, &self.config.segmenter);
        if chunks.is_empty() {
            tracing::warn!(document = document_name, "no chunks segmented");
            return IngestReport {
                duration_ms: elapsed_ms(start),
                ..IngestReport::default()
            };
        }
        tracing::info!(
            document = document_name,
            chunks = chunks.len(),
            "segmentation complete"
        );

        let embeddings = embed_chunks(self.provider.as_ref(), &chunks).await;
        let embedded = !embeddings.is_empty();

        let save = match self
            .store
            .save_chunks(
                document_name,
                &chunks,
                metadata,
                embedded.then_some(embeddings.as_slice()),
            )
            .await
        {
            Ok(save) => save,
            Err(e) => {
                tracing::error!(document = document_name, "index unavailable: {e}");
                let reason = e.to_string();
                return IngestReport {
                    chunks: chunks.len(),
                    saved_ids: Vec::new(),
                    failures: (0..chunks.len())
                        .map(|i| ChunkFailure {
                            sequence: u32::try_from(i).unwrap_or(u32::MAX),
                            reason: reason.clone(),
                        })
                        .collect(),
                    embedded,
                    duration_ms: elapsed_ms(start),
                };
            }
        };

        IngestReport {
            chunks: chunks.len(),
            saved_ids: save.saved_ids,
            failures: save.failures,
            embedded,
            duration_ms: elapsed_ms(start),
        }
    }
}

fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis().try_into().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use serde_json::json;
    use vellum_llm::mock::MockProvider;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn indexer_for(server: &MockServer, provider: MockProvider) -> DocumentIndexer<MockProvider> {
        let store = SearchStore::new(StoreConfig {
            endpoint: server.uri(),
            index: "document-chunks".into(),
            ..StoreConfig::default()
        });
        DocumentIndexer::new(store, Arc::new(provider), IndexerConfig::default())
    }

    async fn mount_write_path(server: &MockServer) {
        Mock::given(method("HEAD"))
            .and(path("/document-chunks"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"result": "created"})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn embed_chunks_empty_input_no_call() {
        let provider = MockProvider::failing_embed();
        // Would error if the provider were contacted.
        assert!(embed_chunks(&provider, &[]).await.is_empty());
    }

    #[tokio::test]
    async fn embed_chunks_degrades_to_empty_on_failure() {
        let provider = MockProvider::failing_embed();
        let vectors = embed_chunks(&provider, &["text".to_string()]).await;
        assert!(vectors.is_empty());
    }

    #[tokio::test]
    async fn embed_chunks_aligned_on_success() {
        let provider = MockProvider::default();
        let vectors = embed_chunks(&provider, &["a".to_string(), "b".to_string()]).await;
        assert_eq!(vectors.len(), 2);
    }

    #[tokio::test]
    async fn headerless_stream_is_zero_chunk_report() {
        let server = MockServer::start().await;
        // No store mocks: nothing may be written.
        let indexer = indexer_for(&server, MockProvider::default());
        let report = indexer
            .ingest(
                "empty.pdf",
                &[Element::paragraph("no headers here")],
                &json!({}),
            )
            .await;
        assert_eq!(report.chunks, 0);
        assert_eq!(report.saved(), 0);
        assert!(!report.embedded);
    }

    #[tokio::test]
    async fn ingest_persists_segmented_chunks_with_embeddings() {
        let server = MockServer::start().await;
        mount_write_path(&server).await;

        let indexer = indexer_for(&server, MockProvider::default());
        let elements = [
            Element::heading("1.1 Scope"),
            Element::paragraph("text A"),
            Element::heading("1.2 Design"),
            Element::paragraph("text B"),
        ];
        let report = indexer.ingest("spec.pdf", &elements, &json!({"rev": 3})).await;
        assert_eq!(report.chunks, 2);
        assert_eq!(report.saved(), 2);
        assert!(report.embedded);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn ingest_continues_without_embeddings() {
        let server = MockServer::start().await;
        mount_write_path(&server).await;

        let indexer = indexer_for(&server, MockProvider::failing_embed());
        let report = indexer
            .ingest("spec.pdf", &[Element::heading("1.1 Scope")], &json!({}))
            .await;
        assert_eq!(report.saved(), 1);
        assert!(!report.embedded);
    }

    #[tokio::test]
    async fn unreachable_index_marks_every_chunk_failed() {
        let server = MockServer::start().await;
        // The existence check itself is rejected, so no chunk can be written.
        Mock::given(method("HEAD"))
            .and(path("/document-chunks"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let indexer = indexer_for(&server, MockProvider::default());
        let elements = [
            Element::heading("1.1 Scope"),
            Element::heading("1.2 Design"),
        ];
        let report = indexer.ingest("spec.pdf", &elements, &json!({})).await;
        assert_eq!(report.chunks, 2);
        assert_eq!(report.saved(), 0);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].sequence, 0);
        assert_eq!(report.failures[1].sequence, 1);
        assert_eq!(report.failures[0].reason, report.failures[1].reason);
    }
}
