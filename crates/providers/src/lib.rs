//! # Recast Providers
//!
//! External provider contracts and their implementations: the embedding
//! provider that maps text to fixed-width vectors, and the LLM provider that
//! maps prompts to generated text.
//!
//! Both contracts are traits so the pipeline can be driven by HTTP-backed
//! providers in production and by deterministic fakes in tests. HTTP
//! implementations speak the OpenAI-compatible wire shapes and honour a
//! per-call deadline; deadline expiry surfaces as a transient
//! [`ProviderError::Timeout`] so the recovery layer can retry it.

mod embedding;
mod error;
mod llm;
pub mod testing;

pub use embedding::{
    normalize_input, EmbeddingProvider, EmbeddingResponse, HttpEmbeddingProvider,
    StubEmbeddingProvider, MAX_EMBED_INPUT_CHARS,
};
pub use error::{ProviderError, Result};
pub use llm::{HttpLlmProvider, LlmProvider};
