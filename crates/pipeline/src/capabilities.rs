use crate::clock::{Clock, SystemClock};
use recast_chunk_store::ChunkStore;
use recast_providers::{EmbeddingProvider, LlmProvider};
use std::sync::Arc;

/// Everything the pipeline needs from the outside world, bundled once at
/// startup. Cloning shares the underlying clients.
#[derive(Clone)]
pub struct Capabilities {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub llm: Arc<dyn LlmProvider>,
    pub store: Arc<dyn ChunkStore>,
    pub clock: Arc<dyn Clock>,
}

impl Capabilities {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        store: Arc<dyn ChunkStore>,
    ) -> Self {
        Self {
            embedder,
            llm,
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Builder: replace the time source
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
