use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Inputs longer than this are truncated before embedding
pub const MAX_EMBED_INPUT_CHARS: usize = 8000;

/// One embedding, as returned by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingResponse {
    pub vector: Vec<f32>,
    pub dimensions: usize,
    pub model: String,
}

/// Maps a text to a fixed-width numeric vector
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text. Implementations normalize the input via
    /// [`normalize_input`] before sending it anywhere.
    async fn embed(&self, text: &str) -> Result<EmbeddingResponse>;

    /// Vector width this provider produces
    fn dimension(&self) -> usize;

    /// Identifier of the embedding model
    fn model(&self) -> &str;
}

/// Collapse whitespace runs to single spaces, then truncate to
/// [`MAX_EMBED_INPUT_CHARS`] characters.
#[must_use]
pub fn normalize_input(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_EMBED_INPUT_CHARS).collect()
}

/// OpenAI-compatible `/embeddings` endpoint client
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    dimension: usize,
    timeout: Duration,
}

#[derive(Deserialize)]
struct EmbeddingsBody {
    data: Vec<EmbeddingsDatum>,
}

#[derive(Deserialize)]
struct EmbeddingsDatum {
    embedding: Vec<f32>,
}

impl HttpEmbeddingProvider {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
            dimension,
            timeout: Duration::from_secs(30),
        }
    }

    /// Builder: override the per-call deadline
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<EmbeddingResponse> {
        let input = normalize_input(text);
        log::debug!("Embedding {} chars via '{}'", input.len(), self.model);

        let request = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "model": self.model, "input": input }))
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_millis() as u64))??;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }

        let body: EmbeddingsBody = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(format!("embeddings body: {e}")))?;
        let vector = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ProviderError::MalformedResponse("empty embeddings data".into()))?;

        if vector.len() != self.dimension {
            return Err(ProviderError::MalformedResponse(format!(
                "expected {} dimensions, got {}",
                self.dimension,
                vector.len()
            )));
        }

        Ok(EmbeddingResponse {
            dimensions: vector.len(),
            vector,
            model: self.model.clone(),
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Deterministic offline embedder: hashes the normalized input into a unit
/// vector. Semantically meaningless but stable, which is what tests and
/// offline smoke runs need.
pub struct StubEmbeddingProvider {
    dimension: usize,
}

impl StubEmbeddingProvider {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<EmbeddingResponse> {
        let input = normalize_input(text);
        Ok(EmbeddingResponse {
            vector: stub_embed(&input, self.dimension),
            dimensions: self.dimension,
            model: "stub".to_string(),
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model(&self) -> &str {
        "stub"
    }
}

fn stub_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        let high = (bits >> 32) as u32;
        let mantissa = high >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_input_collapses_whitespace() {
        assert_eq!(normalize_input("a  b\n\t c"), "a b c");
    }

    #[test]
    fn normalize_input_truncates_long_text() {
        let long = "x".repeat(MAX_EMBED_INPUT_CHARS + 500);
        assert_eq!(normalize_input(&long).len(), MAX_EMBED_INPUT_CHARS);
    }

    #[tokio::test]
    async fn stub_is_deterministic_and_unit_length() {
        let provider = StubEmbeddingProvider::new(64);
        let a = provider.embed("select * from users").await.unwrap();
        let b = provider.embed("select * from users").await.unwrap();
        assert_eq!(a.vector, b.vector);
        assert_eq!(a.dimensions, 64);

        let norm: f32 = a.vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn stub_differs_across_inputs() {
        let provider = StubEmbeddingProvider::new(64);
        let a = provider.embed("one").await.unwrap();
        let b = provider.embed("two").await.unwrap();
        assert_ne!(a.vector, b.vector);
    }

    #[tokio::test]
    async fn stub_normalizes_before_hashing() {
        let provider = StubEmbeddingProvider::new(32);
        let a = provider.embed("hello   world").await.unwrap();
        let b = provider.embed("hello world").await.unwrap();
        assert_eq!(a.vector, b.vector);
    }
}
