//! Test-only scripted provider.

use std::sync::{Arc, Mutex};

use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, Message};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    pub default_response: String,
    pub dimension: usize,
    pub fail_chat: bool,
    pub fail_embed: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock answer".into(),
            dimension: 1536,
            fail_chat: false,
            fail_embed: false,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing_embed() -> Self {
        Self {
            fail_embed: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing_chat() -> Self {
        Self {
            fail_chat: true,
            ..Self::default()
        }
    }

    /// Deterministic non-zero vector so tests can assert on content.
    fn vector(&self, seed: usize) -> Vec<f32> {
        #[allow(clippy::cast_precision_loss)]
        let fill = (seed + 1) as f32 * 0.01;
        vec![fill; self.dimension]
    }
}

impl LlmProvider for MockProvider {
    async fn chat(&self, _messages: &[Message]) -> Result<String> {
        if self.fail_chat {
            return Err(LlmError::Other("mock chat failure".into()));
        }
        let mut responses = self
            .responses
            .lock()
            .map_err(|_| LlmError::Other("mock lock poisoned".into()))?;
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        if self.fail_embed {
            return Err(LlmError::Other("mock embed failure".into()));
        }
        Ok(self.vector(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail_embed {
            return Err(LlmError::Other("mock embed failure".into()));
        }
        Ok((0..texts.len()).map(|i| self.vector(i)).collect())
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_responses_in_order() {
        let p = MockProvider::with_responses(vec!["one".into(), "two".into()]);
        assert_eq!(p.chat(&[]).await.unwrap(), "one");
        assert_eq!(p.chat(&[]).await.unwrap(), "two");
        assert_eq!(p.chat(&[]).await.unwrap(), "mock answer");
    }

    #[tokio::test]
    async fn embed_batch_aligned_with_input() {
        let p = MockProvider::default();
        let vectors = p
            .embed_batch(&["a".into(), "b".into(), "c".into()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 3);
        assert!(vectors.iter().all(|v| v.len() == 1536));
        assert!((vectors[0][0] - 0.01).abs() < f32::EPSILON);
        assert!((vectors[2][0] - 0.03).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn failing_embed_errors() {
        let p = MockProvider::failing_embed();
        assert!(p.embed("x").await.is_err());
        assert!(p.embed_batch(&["x".into()]).await.is_err());
    }

    #[tokio::test]
    async fn failing_chat_errors() {
        let p = MockProvider::failing_chat();
        assert!(p.chat(&[]).await.is_err());
    }
}
