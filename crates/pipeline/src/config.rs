use crate::capabilities::Capabilities;
use crate::error::Result;
use recast_chunk_model::DEFAULT_EMBEDDING_DIMENSION;
use recast_chunk_store::{connect, StoreConfig};
use recast_providers::{HttpEmbeddingProvider, HttpLlmProvider, StubEmbeddingProvider};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Process configuration, collected once at startup from `RECAST_*`
/// environment variables.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    /// "http" or "stub"
    pub embedding_mode: String,
    pub llm_url: String,
    pub llm_model: String,
    pub api_key: String,
    pub store_path: Option<PathBuf>,
    pub similarity_threshold: f32,
    pub result_limit: usize,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| env::var(name).unwrap_or_else(|_| default.to_string());

        Self {
            embedding_url: var(
                "RECAST_EMBEDDING_URL",
                "https://api.openai.com/v1/embeddings",
            ),
            embedding_model: var("RECAST_EMBEDDING_MODEL", "text-embedding-3-small"),
            embedding_dimension: env::var("RECAST_EMBEDDING_DIMENSION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EMBEDDING_DIMENSION),
            embedding_mode: var("RECAST_EMBEDDING_MODE", "http"),
            llm_url: var("RECAST_LLM_URL", "https://api.openai.com/v1/chat/completions"),
            llm_model: var("RECAST_LLM_MODEL", "gpt-4o-mini"),
            api_key: var("RECAST_API_KEY", ""),
            store_path: env::var("RECAST_STORE_PATH").ok().map(PathBuf::from),
            similarity_threshold: env::var("RECAST_SIMILARITY_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.7),
            result_limit: env::var("RECAST_RESULT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
        }
    }

    /// Construct the capability bundle: providers from this config, store
    /// selected by feature detection.
    pub async fn build_capabilities(&self) -> Result<Capabilities> {
        let embedder: Arc<dyn recast_providers::EmbeddingProvider> =
            if self.embedding_mode.eq_ignore_ascii_case("stub") {
                log::info!("Using stub embedding provider ({} dims)", self.embedding_dimension);
                Arc::new(StubEmbeddingProvider::new(self.embedding_dimension))
            } else {
                Arc::new(HttpEmbeddingProvider::new(
                    &self.embedding_url,
                    &self.api_key,
                    &self.embedding_model,
                    self.embedding_dimension,
                ))
            };

        let llm = Arc::new(HttpLlmProvider::new(
            &self.llm_url,
            &self.api_key,
            &self.llm_model,
        ));

        let store = connect(StoreConfig {
            path: self.store_path.clone(),
            disable_index: false,
        })
        .await?;

        Ok(Capabilities::new(embedder, llm, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane_without_env() {
        let config = RuntimeConfig::from_env();
        assert_eq!(config.embedding_dimension, DEFAULT_EMBEDDING_DIMENSION);
        assert!((config.similarity_threshold - 0.7).abs() < 1e-6 || config.similarity_threshold > 0.0);
        assert!(config.result_limit > 0);
    }
}
