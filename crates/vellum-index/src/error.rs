//! Error types for vellum-index.

/// Errors that can occur during indexing and retrieval operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// HTTP transport error talking to the search backend.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Embedding or chat provider error.
    #[error("LLM error: {0}")]
    Llm(#[from] vellum_llm::LlmError),

    /// The search backend rejected a request.
    #[error("backend error (status {status}): {body}")]
    Backend { status: u16, body: String },

    /// Generic catch-all error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using `IndexError`.
pub type Result<T> = std::result::Result<T, IndexError>;
