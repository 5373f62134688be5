//! OpenSearch index store: schema ownership and idempotent chunk upsert.
//!
//! Records are addressed by a deterministic hash of the document name
//! and chunk sequence, so re-ingesting a document overwrites records
//! instead of duplicating them.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{IndexError, Result};

/// Fields returned to callers from search hits.
const SOURCE_FIELDS: [&str; 5] = [
    "chunk_id",
    "content",
    "document_name",
    "timestamp",
    "metadata",
];

/// Connection settings for the OpenSearch backend.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Base URL, e.g. `https://search.internal:9200`.
    pub endpoint: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Target index name.
    pub index: String,
    /// Dimension of the `embedding` field in the index mapping.
    pub embedding_dimension: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://localhost:9200".into(),
            username: None,
            password: None,
            index: "document-chunks".into(),
            embedding_dimension: 1536,
        }
    }
}

/// OpenSearch-backed chunk store.
pub struct SearchStore {
    client: reqwest::Client,
    config: StoreConfig,
}

/// One retrieved chunk with its backend relevance score.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub score: f32,
    pub chunk_id: u32,
    pub content: String,
    pub document_name: String,
    pub timestamp: String,
    #[serde(default)]
    pub metadata: Value,
}

/// Outcome of one chunk write that did not succeed.
#[derive(Debug)]
pub struct ChunkFailure {
    pub sequence: u32,
    pub reason: String,
}

/// Per-chunk outcomes of a batch upsert.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub saved_ids: Vec<String>,
    pub failures: Vec<ChunkFailure>,
}

impl SaveReport {
    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved_ids.len()
    }
}

/// Deterministic record id: same document name and sequence always
/// produce the same id, making re-ingestion an overwrite.
#[must_use]
pub fn chunk_doc_id(document_name: &str, sequence: u32) -> String {
    blake3::hash(format!("{document_name}_chunk_{sequence}").as_bytes())
        .to_hex()
        .to_string()
}

impl SearchStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: vellum_llm::http::default_client(),
            config,
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.config.index
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{path}", self.config.endpoint.trim_end_matches('/'));
        let mut builder = self.client.request(method, url);
        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            builder = builder.basic_auth(user, Some(pass));
        }
        builder
    }

    fn index_settings(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": 1,
                "number_of_replicas": 1,
                "index.knn": true
            },
            "mappings": {
                "properties": {
                    "chunk_id": {"type": "integer"},
                    "content": {"type": "text"},
                    "document_name": {"type": "keyword"},
                    "timestamp": {"type": "date"},
                    "metadata": {"type": "object"},
                    "embedding": {
                        "type": "knn_vector",
                        "dimension": self.config.embedding_dimension,
                        "method": {
                            "name": "hnsw",
                            "space_type": "cosinesimil",
                            "engine": "lucene"
                        }
                    }
                }
            }
        })
    }

    /// Create the index if it does not exist; a no-op otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the existence check or creation request
    /// fails at the transport level or is rejected by the backend.
    pub async fn ensure_index(&self) -> Result<()> {
        let response = self
            .request(reqwest::Method::HEAD, &self.config.index)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        if response.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(IndexError::Backend {
                status: response.status().as_u16(),
                body: String::new(),
            });
        }

        self.create_index().await
    }

    async fn create_index(&self) -> Result<()> {
        let response = self
            .request(reqwest::Method::PUT, &self.config.index)
            .json(&self.index_settings())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        tracing::info!(index = %self.config.index, "index created");
        Ok(())
    }

    /// Delete the index if present, then recreate it with the current
    /// mapping. Existing records are lost.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion (other than "not found") or
    /// creation fails.
    pub async fn reset_index(&self) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, &self.config.index)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        self.create_index().await
    }

    /// Upsert segmented chunks for one document.
    ///
    /// Each chunk is written as a full record under its deterministic
    /// id with `refresh=true`, so records are queryable when this call
    /// returns. One chunk's failure is recorded in the report and does
    /// not abort the rest of the batch.
    ///
    /// # Errors
    ///
    /// Returns an error only when the index cannot be created at all;
    /// individual write failures land in the returned [`SaveReport`].
    pub async fn save_chunks(
        &self,
        document_name: &str,
        chunks: &[String],
        metadata: &Value,
        embeddings: Option<&[Vec<f32>]>,
    ) -> Result<SaveReport> {
        self.ensure_index().await?;

        let timestamp = chrono::Utc::now().to_rfc3339();
        let mut report = SaveReport::default();

        for (i, chunk) in chunks.iter().enumerate() {
            let sequence = u32::try_from(i).map_err(|e| IndexError::Other(e.to_string()))?;
            let doc_id = chunk_doc_id(document_name, sequence);

            let mut doc = json!({
                "chunk_id": sequence,
                "content": chunk.trim(),
                "document_name": document_name,
                "timestamp": timestamp,
                "metadata": metadata,
            });
            if let Some(embedding) = embeddings.and_then(|e| e.get(i)) {
                doc["embedding"] = json!(embedding);
            }

            match self.put_doc(&doc_id, &doc).await {
                Ok(()) => {
                    tracing::debug!(sequence, doc_id = %doc_id, "chunk saved");
                    report.saved_ids.push(doc_id);
                }
                Err(e) => {
                    tracing::warn!(sequence, "chunk save failed: {e}");
                    report.failures.push(ChunkFailure {
                        sequence,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            document = document_name,
            saved = report.saved(),
            failed = report.failures.len(),
            "chunk batch persisted"
        );
        Ok(report)
    }

    async fn put_doc(&self, doc_id: &str, doc: &Value) -> Result<()> {
        let path = format!("{}/_doc/{doc_id}?refresh=true", self.config.index);
        let response = self
            .request(reqwest::Method::PUT, &path)
            .json(doc)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Full-text match against chunk content, top-`size` by the
    /// backend's relevance score.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a backend rejection
    /// other than a missing index, which yields an empty result set.
    pub async fn search(&self, query: &str, size: usize) -> Result<Vec<SearchResult>> {
        let body = json!({
            "query": {
                "match": {
                    "content": query
                }
            },
            "size": size,
            "_source": SOURCE_FIELDS,
        });
        self.run_search(&body).await
    }

    /// Approximate nearest-neighbor search over the embedding field.
    /// Candidates scoring below `min_score` are excluded.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::search`].
    pub async fn vector_search(
        &self,
        query_vector: &[f32],
        size: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let body = json!({
            "query": {
                "knn": {
                    "embedding": {
                        "vector": query_vector,
                        "k": size
                    }
                }
            },
            "min_score": min_score,
            "size": size,
            "_source": SOURCE_FIELDS,
        });
        self.run_search(&body).await
    }

    /// Weighted union of the lexical and vector branches: a record
    /// matching either branch is eligible, scored by the backend's
    /// should-clause sum. Without a query vector this is exactly a
    /// lexical search.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::search`].
    pub async fn hybrid_search(
        &self,
        query_text: &str,
        query_vector: Option<&[f32]>,
        size: usize,
        text_weight: f32,
        vector_weight: f32,
    ) -> Result<Vec<SearchResult>> {
        let Some(vector) = query_vector else {
            return self.search(query_text, size).await;
        };

        let body = json!({
            "query": {
                "bool": {
                    "should": [
                        {
                            "match": {
                                "content": {
                                    "query": query_text,
                                    "boost": text_weight
                                }
                            }
                        },
                        {
                            "knn": {
                                "embedding": {
                                    "vector": vector,
                                    "k": size,
                                    "boost": vector_weight
                                }
                            }
                        }
                    ]
                }
            },
            "size": size,
            "_source": SOURCE_FIELDS,
        });
        self.run_search(&body).await
    }

    async fn run_search(&self, body: &Value) -> Result<Vec<SearchResult>> {
        let path = format!("{}/_search", self.config.index);
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        // A query against an index that was never created is an empty
        // result set, not an error.
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let text = response.text().await?;
        if !status.is_success() {
            return Err(IndexError::Backend {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&text)?;
        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(Hit::into_result)
            .collect())
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Deserialize)]
struct Hits {
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: f32,
    #[serde(rename = "_source")]
    source: HitSource,
}

#[derive(Deserialize)]
struct HitSource {
    chunk_id: u32,
    content: String,
    document_name: String,
    timestamp: String,
    #[serde(default)]
    metadata: Value,
}

impl Hit {
    fn into_result(self) -> SearchResult {
        SearchResult {
            id: self.id,
            score: self.score,
            chunk_id: self.source.chunk_id,
            content: self.source.content,
            document_name: self.source.document_name,
            timestamp: self.source.timestamp,
            metadata: self.source.metadata,
        }
    }
}
