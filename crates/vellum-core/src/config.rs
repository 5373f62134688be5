use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use vellum_index::indexer::IndexerConfig;
use vellum_index::retriever::{QueryConfig, SearchMode};
use vellum_index::segmenter::SegmenterConfig;
use vellum_index::store::StoreConfig;
use vellum_llm::azure::AzureConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub opensearch: OpenSearchSection,
    pub azure: AzureSection,
    pub ingest: IngestSection,
    pub query: QuerySection,
}

#[derive(Debug, Deserialize)]
pub struct OpenSearchSection {
    pub endpoint: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub index: String,
}

#[derive(Debug, Deserialize)]
pub struct AzureSection {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub chat_deployment: String,
    pub embedding_deployment: String,
    pub embedding_dimension: usize,
}

#[derive(Debug, Deserialize)]
pub struct IngestSection {
    pub use_dynamic_headers: bool,
}

#[derive(Debug, Deserialize)]
pub struct QuerySection {
    pub mode: SearchMode,
    pub size: usize,
    pub min_score: f32,
    pub text_weight: f32,
    pub vector_weight: f32,
    pub max_context_length: usize,
}

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("VELLUM_OPENSEARCH_ENDPOINT") {
            self.opensearch.endpoint = v;
        }
        if let Ok(v) = std::env::var("VELLUM_OPENSEARCH_USERNAME") {
            self.opensearch.username = Some(v);
        }
        if let Ok(v) = std::env::var("VELLUM_OPENSEARCH_PASSWORD") {
            self.opensearch.password = Some(v);
        }
        if let Ok(v) = std::env::var("VELLUM_AZURE_ENDPOINT") {
            self.azure.endpoint = v;
        }
        if let Ok(v) = std::env::var("VELLUM_AZURE_API_KEY") {
            self.azure.api_key = v;
        }
    }

    fn default() -> Self {
        Self {
            opensearch: OpenSearchSection {
                endpoint: "http://localhost:9200".into(),
                username: None,
                password: None,
                index: "document-chunks".into(),
            },
            azure: AzureSection {
                endpoint: String::new(),
                api_key: String::new(),
                api_version: "2024-02-01".into(),
                chat_deployment: "gpt-4o".into(),
                embedding_deployment: "text-embedding-3-small".into(),
                embedding_dimension: 1536,
            },
            ingest: IngestSection {
                use_dynamic_headers: true,
            },
            query: QuerySection {
                mode: SearchMode::Hybrid,
                size: 5,
                min_score: 0.7,
                text_weight: 0.5,
                vector_weight: 0.5,
                max_context_length: 50_000,
            },
        }
    }

    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            endpoint: self.opensearch.endpoint.clone(),
            username: self.opensearch.username.clone(),
            password: self.opensearch.password.clone(),
            index: self.opensearch.index.clone(),
            embedding_dimension: self.azure.embedding_dimension,
        }
    }

    #[must_use]
    pub fn azure_config(&self) -> AzureConfig {
        AzureConfig {
            endpoint: self.azure.endpoint.clone(),
            api_key: self.azure.api_key.clone(),
            api_version: self.azure.api_version.clone(),
            chat_deployment: self.azure.chat_deployment.clone(),
            embedding_deployment: self.azure.embedding_deployment.clone(),
            embedding_dimension: self.azure.embedding_dimension,
        }
    }

    #[must_use]
    pub fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig {
            segmenter: SegmenterConfig {
                use_dynamic_headers: self.ingest.use_dynamic_headers,
            },
        }
    }

    #[must_use]
    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            mode: self.query.mode,
            size: self.query.size,
            min_score: self.query.min_score,
            text_weight: self.query.text_weight,
            vector_weight: self.query.vector_weight,
            max_context_length: self.query.max_context_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let config = Config::default();
        assert_eq!(config.opensearch.endpoint, "http://localhost:9200");
        assert_eq!(config.opensearch.index, "document-chunks");
        assert_eq!(config.azure.embedding_dimension, 1536);
        assert_eq!(config.query.mode, SearchMode::Hybrid);
        assert_eq!(config.query.max_context_length, 50_000);
        assert!(config.ingest.use_dynamic_headers);
    }

    #[test]
    fn parse_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"
[opensearch]
endpoint = "https://search:9200"
username = "svc"
password = "secret"
index = "chunks-test"

[azure]
endpoint = "https://example.openai.azure.com"
api_key = "key"
api_version = "2024-02-01"
chat_deployment = "gpt-4o"
embedding_deployment = "text-embedding-3-small"
embedding_dimension = 1536

[ingest]
use_dynamic_headers = false

[query]
mode = "vector"
size = 8
min_score = 0.5
text_weight = 0.6
vector_weight = 0.4
max_context_length = 10000
"#
        )
        .unwrap();

        // Remove any VELLUM_ env vars that could interfere
        for key in [
            "VELLUM_OPENSEARCH_ENDPOINT",
            "VELLUM_OPENSEARCH_USERNAME",
            "VELLUM_OPENSEARCH_PASSWORD",
            "VELLUM_AZURE_ENDPOINT",
            "VELLUM_AZURE_API_KEY",
        ] {
            unsafe { std::env::remove_var(key) };
        }

        let config = Config::load(&path).unwrap();
        assert_eq!(config.opensearch.index, "chunks-test");
        assert_eq!(config.query.mode, SearchMode::Vector);
        assert_eq!(config.query.size, 8);
        assert!(!config.ingest.use_dynamic_headers);
    }

    #[test]
    fn env_overrides() {
        let mut config = Config::default();
        assert_eq!(config.opensearch.password, None);

        unsafe { std::env::set_var("VELLUM_OPENSEARCH_PASSWORD", "hunter2") };
        config.apply_env_overrides();
        unsafe { std::env::remove_var("VELLUM_OPENSEARCH_PASSWORD") };

        assert_eq!(config.opensearch.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn sections_convert_to_component_configs() {
        let config = Config::default();
        let store = config.store_config();
        assert_eq!(store.index, "document-chunks");
        assert_eq!(store.embedding_dimension, 1536);

        let query = config.query_config();
        assert_eq!(query.size, 5);
        assert!((query.min_score - 0.7).abs() < f32::EPSILON);
    }
}
