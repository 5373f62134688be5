//! Azure OpenAI backend: deployment-scoped embeddings and chat completions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, Message, Role};

/// Default chat sampling temperature. Answers are grounded in retrieved
/// evidence, so generation stays near-deterministic.
const CHAT_TEMPERATURE: f32 = 0.1;

/// Connection settings for one Azure OpenAI resource.
///
/// Values come from configuration, never from process environment read
/// at call sites. `embedding_dimension` must match the index schema the
/// vectors are written to.
#[derive(Clone, Debug)]
pub struct AzureConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub chat_deployment: String,
    pub embedding_deployment: String,
    pub embedding_dimension: usize,
}

pub struct AzureProvider {
    client: reqwest::Client,
    config: AzureConfig,
}

impl fmt::Debug for AzureProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureProvider")
            .field("endpoint", &self.config.endpoint)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.config.api_version)
            .field("chat_deployment", &self.config.chat_deployment)
            .field("embedding_deployment", &self.config.embedding_deployment)
            .field("embedding_dimension", &self.config.embedding_dimension)
            .finish()
    }
}

impl AzureProvider {
    /// Build a provider from explicit connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingCredential`] when the endpoint or API
    /// key is empty, so a misconfigured deployment fails at construction
    /// rather than on the first request.
    pub fn new(mut config: AzureConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(LlmError::MissingCredential("endpoint"));
        }
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential("api_key"));
        }
        while config.endpoint.ends_with('/') {
            config.endpoint.pop();
        }
        Ok(Self {
            client: crate::http::default_client(),
            config,
        })
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{deployment}/{operation}?api-version={}",
            self.config.endpoint, self.config.api_version
        )
    }

    async fn post_embeddings(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>> {
        let url = self.deployment_url(&self.config.embedding_deployment, "embeddings");
        let body = EmbeddingRequest { input: inputs };

        let response = self
            .client
            .post(url)
            .header("api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(LlmError::Http)?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            tracing::error!("Azure embedding API error {status}: {text}");
            return Err(LlmError::Other(format!(
                "Azure embedding request failed (status {status})"
            )));
        }

        let resp: EmbeddingResponse = serde_json::from_str(&text)?;

        // Azure returns entries carrying an explicit index; re-order so
        // output position i always matches input position i.
        let mut data = resp.data;
        data.sort_by_key(|d| d.index);
        if data.len() != inputs.len() {
            return Err(LlmError::BatchMisaligned {
                sent: inputs.len(),
                received: data.len(),
            });
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

impl LlmProvider for AzureProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String> {
        let api_messages: Vec<ApiMessage<'_>> = messages.iter().map(convert_message).collect();
        let body = ChatRequest {
            messages: &api_messages,
            temperature: CHAT_TEMPERATURE,
        };

        let url = self.deployment_url(&self.config.chat_deployment, "chat/completions");
        let response = self
            .client
            .post(url)
            .header("api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(LlmError::Http)?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            tracing::error!("Azure chat API error {status}: {text}");
            return Err(LlmError::Other(format!(
                "Azure chat request failed (status {status})"
            )));
        }

        let resp: ChatResponse = serde_json::from_str(&text)?;
        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse { provider: "azure" })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.post_embeddings(&[text]).await?;
        vectors
            .pop()
            .ok_or(LlmError::EmptyResponse { provider: "azure" })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.post_embeddings(&inputs).await
    }

    fn embedding_dimension(&self) -> usize {
        self.config.embedding_dimension
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &'static str {
        "azure"
    }
}

fn convert_message(msg: &Message) -> ApiMessage<'_> {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    ApiMessage {
        role,
        content: &msg.content,
    }
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ApiMessage<'a>],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(endpoint: &str) -> AzureConfig {
        AzureConfig {
            endpoint: endpoint.into(),
            api_key: "azure-test-key".into(),
            api_version: "2024-02-01".into(),
            chat_deployment: "gpt-4o".into(),
            embedding_deployment: "text-embedding-ada-002".into(),
            embedding_dimension: 1536,
        }
    }

    #[test]
    fn new_rejects_empty_endpoint() {
        let mut config = test_config("");
        config.endpoint = String::new();
        assert!(matches!(
            AzureProvider::new(config),
            Err(LlmError::MissingCredential("endpoint"))
        ));
    }

    #[test]
    fn new_rejects_empty_api_key() {
        let mut config = test_config("https://res.openai.azure.com");
        config.api_key = String::new();
        assert!(matches!(
            AzureProvider::new(config),
            Err(LlmError::MissingCredential("api_key"))
        ));
    }

    #[test]
    fn new_strips_trailing_slash() {
        let p = AzureProvider::new(test_config("https://res.openai.azure.com/")).unwrap();
        assert_eq!(p.config.endpoint, "https://res.openai.azure.com");
    }

    #[test]
    fn debug_redacts_api_key() {
        let p = AzureProvider::new(test_config("https://res.openai.azure.com")).unwrap();
        let debug = format!("{p:?}");
        assert!(!debug.contains("azure-test-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn deployment_url_shape() {
        let p = AzureProvider::new(test_config("https://res.openai.azure.com")).unwrap();
        assert_eq!(
            p.deployment_url("dep", "embeddings"),
            "https://res.openai.azure.com/openai/deployments/dep/embeddings?api-version=2024-02-01"
        );
    }

    #[test]
    fn embedding_dimension_from_config() {
        let p = AzureProvider::new(test_config("https://res.openai.azure.com")).unwrap();
        assert_eq!(p.embedding_dimension(), 1536);
    }

    #[test]
    fn name_returns_azure() {
        let p = AzureProvider::new(test_config("https://res.openai.azure.com")).unwrap();
        assert_eq!(p.name(), "azure");
    }

    #[tokio::test]
    async fn embed_batch_empty_input_skips_network() {
        // Unreachable endpoint: the call must short-circuit before any request.
        let p = AzureProvider::new(test_config("http://127.0.0.1:1")).unwrap();
        let vectors = p.embed_batch(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }

    #[tokio::test]
    async fn embed_unreachable_endpoint_errors() {
        let p = AzureProvider::new(test_config("http://127.0.0.1:1")).unwrap();
        assert!(p.embed("test").await.is_err());
    }

    #[tokio::test]
    async fn chat_unreachable_endpoint_errors() {
        let p = AzureProvider::new(test_config("http://127.0.0.1:1")).unwrap();
        assert!(p.chat(&[Message::user("hi")]).await.is_err());
    }

    #[tokio::test]
    async fn embed_batch_reorders_by_index() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/openai/deployments/text-embedding-ada-002/embeddings",
            ))
            .and(query_param("api-version", "2024-02-01"))
            .and(header("api-key", "azure-test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"index": 1, "embedding": [2.0]},
                    {"index": 0, "embedding": [1.0]}
                ]
            })))
            .mount(&server)
            .await;

        let p = AzureProvider::new(test_config(&server.uri())).unwrap();
        let vectors = p
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors, vec![vec![1.0], vec![2.0]]);
    }

    #[tokio::test]
    async fn embed_batch_count_mismatch_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/openai/deployments/text-embedding-ada-002/embeddings",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"index": 0, "embedding": [1.0]}]
            })))
            .mount(&server)
            .await;

        let p = AzureProvider::new(test_config(&server.uri())).unwrap();
        let result = p.embed_batch(&["a".to_string(), "b".to_string()]).await;
        assert!(matches!(
            result,
            Err(LlmError::BatchMisaligned {
                sent: 2,
                received: 1
            })
        ));
    }

    #[tokio::test]
    async fn chat_parses_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-4o/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "pong"}}]
            })))
            .mount(&server)
            .await;

        let p = AzureProvider::new(test_config(&server.uri())).unwrap();
        let answer = p.chat(&[Message::user("ping")]).await.unwrap();
        assert_eq!(answer, "pong");
    }

    #[tokio::test]
    async fn chat_empty_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-4o/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let p = AzureProvider::new(test_config(&server.uri())).unwrap();
        assert!(matches!(
            p.chat(&[Message::user("ping")]).await,
            Err(LlmError::EmptyResponse { provider: "azure" })
        ));
    }

    #[tokio::test]
    async fn rate_limit_maps_to_typed_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/openai/deployments/text-embedding-ada-002/embeddings",
            ))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let p = AzureProvider::new(test_config(&server.uri())).unwrap();
        assert!(matches!(
            p.embed("x").await,
            Err(LlmError::RateLimited)
        ));
    }

    #[test]
    fn chat_request_serialization() {
        let msgs = [ApiMessage {
            role: "user",
            content: "hello",
        }];
        let body = ChatRequest {
            messages: &msgs,
            temperature: 0.1,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"temperature\":0.1"));
    }

    #[test]
    fn embedding_request_serialization() {
        let body = EmbeddingRequest {
            input: &["a", "b"],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"input":["a","b"]}"#);
    }

    #[test]
    fn convert_message_maps_roles() {
        let msg = Message::system("prompt");
        let api = convert_message(&msg);
        assert_eq!(api.role, "system");
        assert_eq!(api.content, "prompt");
    }
}
