use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Backend abstraction over the embedding and answer-generation services.
///
/// Implementations are blocking black boxes from the pipeline's point of
/// view: no retries or timeouts beyond what the HTTP client carries, and
/// every failure surfaces as a typed [`crate::LlmError`] for the caller
/// to degrade on.
pub trait LlmProvider: Send + Sync {
    /// Send messages and return the assistant response text.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or replies
    /// with a malformed or empty body.
    fn chat(
        &self,
        messages: &[Message],
    ) -> impl Future<Output = crate::error::Result<String>> + Send;

    /// Embed a single query string.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a malformed response.
    fn embed(&self, text: &str) -> impl Future<Output = crate::error::Result<Vec<f32>>> + Send;

    /// Embed a batch of chunk texts, one vector per input, aligned by
    /// position. An empty input must yield an empty output without a
    /// network call.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a malformed response, or
    /// a response whose vector count differs from the input count.
    fn embed_batch(
        &self,
        texts: &[String],
    ) -> impl Future<Output = crate::error::Result<Vec<Vec<f32>>>> + Send;

    /// Dimension of the vectors produced by [`Self::embed`].
    fn embedding_dimension(&self) -> usize;

    fn name(&self) -> &'static str;
}
