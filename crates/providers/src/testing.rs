//! Deterministic provider fakes for tests and offline smoke runs.
//!
//! Kept in the library (not behind `cfg(test)`) so downstream crates can
//! drive the pipeline without a network.

use crate::embedding::{EmbeddingProvider, EmbeddingResponse, StubEmbeddingProvider};
use crate::error::{ProviderError, Result};
use crate::llm::LlmProvider;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// LLM fake that replays a scripted sequence of outcomes, then keeps
/// returning the last scripted text.
pub struct ScriptedLlm {
    script: Mutex<VecDeque<Result<String>>>,
    fallback: String,
    calls: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(script: Vec<Result<String>>) -> Self {
        let fallback = script
            .iter()
            .rev()
            .find_map(|entry| entry.as_ref().ok().cloned())
            .unwrap_or_default();
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fake that always answers with `text`
    pub fn always(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: text,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(outcome) => outcome,
            None => Ok(self.fallback.clone()),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Embedding fake: deterministic stub vectors, with an optional queue of
/// failures injected ahead of the real answers.
pub struct ScriptedEmbedder {
    inner: StubEmbeddingProvider,
    failures: Mutex<VecDeque<ProviderError>>,
}

impl ScriptedEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: StubEmbeddingProvider::new(dimension),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a failure to be returned before the next successful embed
    pub fn fail_next(&self, error: ProviderError) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(error);
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbedder {
    async fn embed(&self, text: &str) -> Result<EmbeddingResponse> {
        let queued = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        if let Some(error) = queued {
            return Err(error);
        }
        self.inner.embed(text).await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn model(&self) -> &str {
        "scripted-stub"
    }
}
