#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rate limited")]
    RateLimited,

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("embedding batch misaligned: sent {sent}, received {received}")]
    BatchMisaligned { sent: usize, received: usize },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;
